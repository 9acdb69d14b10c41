//! Step through a memoized F(6) tree and print each reveal.

use fibtree::{BuildMode, BuildRequest, RevealEvent, Visualizer, VisualizerConfig};

fn main() -> anyhow::Result<()> {
    let mut vis = Visualizer::new(VisualizerConfig::default());
    vis.build(BuildRequest::new(6, BuildMode::Memoized, true)?)?;

    while let Some(step) = vis.step() {
        for event in &step.events {
            match event {
                RevealEvent::Node { label, position, cached, .. } => {
                    println!("{label} at {position}{}", if *cached { " (cached)" } else { "" })
                }
                RevealEvent::Edge { parent, child, dashed, .. } => {
                    println!("  edge {parent} -> {child}{}", if *dashed { " (dashed)" } else { "" })
                }
            }
        }
    }

    if let Some(summary) = vis.summary() {
        println!("\n{summary}");
    }
    Ok(())
}
