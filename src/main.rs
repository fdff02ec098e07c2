fn main() {
    svcgraph::cli::run();
}
