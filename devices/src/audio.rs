use qcmd_common::{Entity, OptionEnum};

use crate::facade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBackend {
    None,
    Alsa,
    Pa,
    Pipewire,
    Sdl,
    Oss,
    CoreAudio,
    Wav,
}

impl OptionEnum for AudioBackend {
    fn as_str(&self) -> &'static str {
        match self {
            AudioBackend::None => "none",
            AudioBackend::Alsa => "alsa",
            AudioBackend::Pa => "pa",
            AudioBackend::Pipewire => "pipewire",
            AudioBackend::Sdl => "sdl",
            AudioBackend::Oss => "oss",
            AudioBackend::CoreAudio => "coreaudio",
            AudioBackend::Wav => "wav",
        }
    }
}

/// `-audiodev <backend>,id=..[,...]`
#[derive(Debug, Clone)]
pub struct Audiodev {
    entity: Entity,
}

impl Audiodev {
    pub fn new(backend: AudioBackend, id: impl Into<String>) -> Self {
        let mut entity = Entity::new("audiodev", backend.as_str());
        entity.set_property("id", id.into());
        Self { entity }
    }

    /// Polling period in microseconds.
    pub fn timer_period(mut self, micros: u32) -> Self {
        self.entity.set_property("timer-period", micros);
        self
    }

    /// Sound server address for network backends such as PulseAudio.
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.entity.set_property("server", server.into());
        self
    }

    pub fn out_frequency(mut self, hz: u32) -> Self {
        self.entity.set_property("out.frequency", hz);
        self
    }

    pub fn out_channels(mut self, channels: u8) -> Self {
        self.entity.set_property("out.channels", channels);
        self
    }

    pub fn in_frequency(mut self, hz: u32) -> Self {
        self.entity.set_property("in.frequency", hz);
        self
    }

    /// Output file for the `wav` backend.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.entity.set_property("path", path.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundModel {
    IntelHda,
    HdaDuplex,
    HdaOutput,
    Ac97,
    Es1370,
}

impl OptionEnum for SoundModel {
    fn as_str(&self) -> &'static str {
        match self {
            SoundModel::IntelHda => "intel-hda",
            SoundModel::HdaDuplex => "hda-duplex",
            SoundModel::HdaOutput => "hda-output",
            SoundModel::Ac97 => "AC97",
            SoundModel::Es1370 => "ES1370",
        }
    }
}

/// `-device <sound model>[,audiodev=..]`
#[derive(Debug, Clone)]
pub struct SoundCard {
    entity: Entity,
}

impl SoundCard {
    pub fn new(model: SoundModel) -> Self {
        Self {
            entity: Entity::new("device", model.as_str()),
        }
    }

    pub fn audiodev(mut self, id: impl Into<String>) -> Self {
        self.entity.set_property("audiodev", id.into());
        self
    }
}

facade!(Audiodev, SoundCard);
