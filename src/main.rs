fn main() -> std::process::ExitCode {
    freesor_sync_lib::run()
}
