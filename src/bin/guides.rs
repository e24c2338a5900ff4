//! List the state guides or print one guide with its FAQ.

use anyhow::Result;
use clap::Parser;
use sparkindex::guides::{all_guides, guide_by_abbreviation, guide_by_slug, guides_in_region, Region};

#[derive(Parser, Debug)]
#[command(name = "guides")]
#[command(about = "Browse the per-state business-starting guides")]
struct Args {
    /// State slug (e.g. `new-york`) or postal abbreviation (e.g. `NY`)
    state: Option<String>,

    /// Only list states in this census region (northeast, midwest, south, west)
    #[arg(long)]
    region: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(state) = args.state.as_deref() {
        let guide = guide_by_slug(state)
            .or_else(|| guide_by_abbreviation(state))
            .ok_or_else(|| anyhow::anyhow!("No guide for {:?}. Run without arguments to list states.", state))?;

        if args.json {
            let value = serde_json::json!({
                "guide": guide,
                "title": guide.title(),
                "description": guide.meta_description(),
                "faqs": guide.faqs(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{}\n", guide.title());
        println!("{}\n", guide.meta_description());
        for faq in guide.faqs() {
            println!("Q: {}", faq.question);
            println!("A: {}\n", faq.answer);
        }
        return Ok(());
    }

    let guides: Vec<_> = match args.region.as_deref() {
        Some(r) => {
            let region = Region::parse(r)
                .ok_or_else(|| anyhow::anyhow!("Unknown region {:?}", r))?;
            guides_in_region(region)
        }
        None => all_guides().iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&guides)?);
        return Ok(());
    }

    println!("{:<4} {:<24} {:<24} {:<10}", "Abbr", "State", "Slug", "Region");
    println!("{:-<64}", "");
    for guide in &guides {
        println!(
            "{:<4} {:<24} {:<24} {:<10}",
            guide.abbreviation, guide.name, guide.slug, guide.region
        );
    }
    println!("\n{} guides", guides.len());

    Ok(())
}
