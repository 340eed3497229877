fn main() -> std::process::ExitCode {
    farm_lens_lib::run()
}
