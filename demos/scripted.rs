use climate_panel::{ClimateCommand, ClimateConfig, ClimatePanel, ClimateToggle};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let config = ClimateConfig::builder()
        .title("Climate (scripted)".to_string())
        .maybe_font_path(std::env::args_os().nth(1).map(Into::into))
        .build();
    let mut panel = ClimatePanel::new(config)?;

    // Drive the panel from a background thread; commands are applied on the
    // window thread before each frame.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let toggle = ClimateToggle::ALL[rng.random_range(0..ClimateToggle::ALL.len())];
            let commands = [
                ClimateCommand::SetTemperature(rng.random_range(40.0..90.0)),
                ClimateCommand::SetFanStep(rng.random_range(0..5)),
                ClimateCommand::Toggle(toggle),
            ];

            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(1200));
        }
    });

    println!("Displaying climate panel driven by random commands:");
    println!("- Dial: jumps to a random temperature and springs there");
    println!("- Fan: snaps to a random step");
    println!("- Toggles: one random toggle flips each round");
    println!("The controls still respond to the mouse. Close the window to exit");

    panel.show_with_commands(receiver)?;
    Ok(())
}
