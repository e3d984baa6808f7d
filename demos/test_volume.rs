/// Example program to check volume actuator selection on this machine
/// Run with: cargo run --example test_volume -- [level]

use handvol_lib::models::volume::to_percent;
use handvol_lib::platform::{get_data_directory, get_volume_actuator, NullVolume, VolumeActuator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Volume Actuator Test ===\n");

    // Only touch the real mixer when a level is passed explicitly
    let requested: Option<f32> = std::env::args().nth(1).map(|s| s.parse::<f32>()).transpose()?;

    println!("Actuator:");
    match get_volume_actuator() {
        Ok(mut actuator) => {
            println!("  Backend: {}", actuator.name());
            if let Some(level) = requested {
                match actuator.set_volume(level) {
                    Ok(()) => println!("  Set volume: ✓ {}%", to_percent(level)),
                    Err(e) => println!("  Set volume: ✗ {}", e),
                }
            } else {
                println!("  (pass a level, e.g. `-- 40`, to change the system volume)");
            }
        }
        Err(e) => {
            println!("  Error selecting actuator: {}", e);
        }
    }
    println!();

    println!("Dry-run actuator:");
    let mut null = NullVolume::new();
    for level in [12.4, 12.6, 13.2, 150.0] {
        null.set_volume(level)?;
        println!("  {:>6.1} -> applied {:?}", level, null.last_applied());
    }
    println!("  Distinct levels applied: {}", null.applied_count());
    println!();

    println!("Data Storage:");
    match get_data_directory() {
        Ok(dir) => {
            println!("  Data Directory: {}", dir.display());
            println!("  Config: {}", dir.join("config.json").display());
            println!("  Reports: {}", dir.join("reports").display());
        }
        Err(e) => {
            println!("  Error getting data directory: {}", e);
        }
    }

    println!("\n=== Test Complete ===");
    Ok(())
}
