use anyhow::Result;
use racer_training::SUPPORTED_REGIONS;

pub fn execute(json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&SUPPORTED_REGIONS)?);
        return Ok(());
    }
    for region in SUPPORTED_REGIONS {
        println!("{region}");
    }
    Ok(())
}
