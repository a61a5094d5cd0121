fn main() -> anyhow::Result<()> {
    hovercraft_lib::run()
}
