use std::{env, fs::File, io::prelude::*, path::PathBuf};

fn main() {
    if cfg!(feature = "ld") {
        gen_memory_x();
    }
    println!("cargo:rerun-if-changed=build.rs");
}

/// Generate `memory.x` for the TM4C123GH6PM
///
/// 256 KiB of flash at 0x0000_0000 and 32 KiB of SRAM at 0x2000_0000, see the
/// memory map in the TM4C123GH6PM datasheet.
fn gen_memory_x() {
    const FLASH_KIB: u32 = 256;
    const RAM_KIB: u32 = 32;

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let mut file = File::create(out_dir.join("memory.x")).unwrap();
    writeln!(file, "MEMORY {{").unwrap();
    writeln!(file, "    FLASH (rx) : o = 0x00000000, l = {}K", FLASH_KIB).unwrap();
    writeln!(file, "    RAM (rwx) : o = 0x20000000, l = {}K", RAM_KIB).unwrap();
    writeln!(file, "}}").unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
}
