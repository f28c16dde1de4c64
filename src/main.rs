// Prevents additional console window on Windows in release builds
#![cfg_attr(all(feature = "desktop", not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
fn main() {
    moodboard_lib::run()
}

#[cfg(not(feature = "desktop"))]
fn main() -> anyhow::Result<()> {
    moodboard_lib::shell::main()
}
