use clap_complete::Shell;

pub fn run(shell: Shell, cmd: &mut clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
    Ok(())
}
