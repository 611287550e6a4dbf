//! Profiles command - list the airport traffic profiles.

use margolis::config::AirportProfile;

use crate::error::CliError;

/// Print the profile table.
pub fn run() -> Result<(), CliError> {
    println!("Airport profiles:");
    println!();
    println!("  {:<5} {:<34} {:<26} {:>13}", "CODE", "AIRPORT", "LOCATION", "INTERNATIONAL");
    for profile in AirportProfile::ALL {
        let marker = if profile == AirportProfile::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<5} {:<34} {:<26} {:>12}%{}",
            profile.code(),
            profile.long_name(),
            profile.location(),
            profile.international_percentage(),
            marker
        );
    }
    Ok(())
}
