fn main() {
    // Only the desktop shell needs the Tauri context (config, icons, capabilities).
    #[cfg(feature = "desktop")]
    {
        tauri_build::build();
    }
}
