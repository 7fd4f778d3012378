fn main() {
    #[cfg(feature = "cli")]
    scel2rime::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("scel2rime: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
