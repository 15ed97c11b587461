fn main() -> anyhow::Result<()> {
    pencil_inspect_lib::run()
}
