fn main() -> anyhow::Result<()> {
    engress_lib::run()
}
