fn main() {
    compiler_test::cli::run();
}
