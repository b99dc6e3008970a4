//! `regimekit classify` – print the classification of a task.

use anyhow::Result;
use regimekit_core::classifier::TaskClassifier;
use regimekit_core::config::KernelConfig;

pub fn run_classify(
    cfg: &KernelConfig,
    task: &str,
    keywords: &[String],
    description: &str,
) -> Result<()> {
    let classifier = TaskClassifier::new(
        cfg.classifier.confidence_weights(),
        cfg.classifier.distribution(),
    );
    let classification = classifier.classify(task, keywords, description);
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}
