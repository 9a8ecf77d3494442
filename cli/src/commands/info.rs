use colored::*;
use qcmd_common::config::Config;

use crate::terminal::{colors, print};

const FAMILIES: &[(&str, &str)] = &[
    ("machine", "-machine -cpu -m -smp -kernel -initrd -append"),
    ("block", "-drive"),
    ("net", "-netdev -nic -device <nic>"),
    ("monitor", "-chardev -mon -qmp"),
    ("display", "-display -vnc"),
    ("audio", "-audiodev -device <sound>"),
    ("tpm", "-tpmdev -device tpm-*"),
    ("object", "-object memory-backend-*"),
    ("numa", "-numa node|cpu|dist|hmat-lb|hmat-cache"),
];

pub fn info(cfg: &Config) {
    print::aligned_line("Version", env!("CARGO_PKG_VERSION"));
    print::aligned_line("Hypervisor", cfg.qemu_binary.display().to_string());
    print::aligned_line("Image tool", cfg.img_binary.display().to_string());
    print::print("");

    print::tree_head(0, "Option families");
    let details: Vec<(String, ColoredString)> = FAMILIES
        .iter()
        .map(|(family, flags)| (family.to_string(), flags.color(colors::TEXT_DEFAULT)))
        .collect();
    print::as_tree_one_level(details);
}
