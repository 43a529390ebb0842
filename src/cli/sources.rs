use anyhow::Result;
use clap::Args;

use crate::core::orchestrator::ProviderDescriptor;
use crate::services::SimpleServices;

#[derive(Args)]
pub struct SourcesArgs {}

fn print_descriptors(descriptors: &[ProviderDescriptor]) {
    for descriptor in descriptors {
        let status = if descriptor.is_available { "✅" } else { "⛔ not configured" };
        println!("  {}. {} {}", descriptor.priority, descriptor.name, status);
    }
}

pub async fn execute(_args: SourcesArgs, services: &SimpleServices) -> Result<()> {
    println!("🎵 Lyrics sources (in order of preference):");
    print_descriptors(&services.create_source_manager().descriptors());

    println!("\n🌐 Translators:");
    print_descriptors(&services.create_translation_manager().descriptors());
    Ok(())
}
