//! Human-readable Markdown report for a pipeline run.

use crate::cluster::CLUSTER_COLUMNS;
use crate::runner::PipelineResult;
use crate::stats::strongest;

const TOP_CORRELATIONS: usize = 5;
const TOP_RULES: usize = 10;
const TOP_FEATURES: usize = 6;

/// Generate the analysis report for a single run.
pub fn generate_report(result: &PipelineResult) -> String {
    let mut md = String::with_capacity(4096);
    let config = &result.config;

    md.push_str("# Sentiment vs Performance Report\n\n");

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Stock | {} |\n", config.stock_symbol));
    md.push_str(&format!("| Index | {} |\n", config.index_symbol));
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        config.start_date, config.end_date
    ));
    md.push_str(&format!("| Trading Days | {} |\n", result.rows.len()));
    md.push_str(&format!("| Master Seed | {} |\n", config.master_seed));
    md.push_str(&format!("| Run ID | {} |\n", result.run_id));
    md.push('\n');

    // Data provenance
    let modes = &result.source_modes;
    md.push_str("## Data Sources\n\n");
    md.push_str("| Input | Mode |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Stock Prices | {} |\n", modes.stock_prices));
    md.push_str(&format!("| Index Prices | {} |\n", modes.index_prices));
    md.push_str(&format!("| News | {} |\n", modes.news));
    md.push_str(&format!("| Sentiment Scorer | {} |\n", modes.scorer));
    md.push('\n');
    if modes.any_synthetic() {
        md.push_str(
            "> **SYNTHETIC DATA**: one or more inputs were generated, not \
             fetched. Conclusions do not describe the real market.\n\n",
        );
    }

    // Correlations
    md.push_str("## Correlations\n\n");
    if let Some(headline) = &result.correlations.sentiment_vs_relative_perf {
        md.push_str(&format!(
            "Sentiment vs relative performance: r = {:.4}, p = {:.4} ({}significant at 0.05), n = {}.\n\n",
            headline.r,
            headline.p_value,
            if headline.is_significant() { "" } else { "not " },
            headline.n
        ));
    } else {
        md.push_str("Sentiment vs relative performance: not computable (constant or too-short series).\n\n");
    }

    let top = strongest(&result.correlations, TOP_CORRELATIONS);
    if !top.is_empty() {
        md.push_str("| Pair | r | p-value | n |\n");
        md.push_str("| --- | ---: | ---: | ---: |\n");
        for c in &top {
            md.push_str(&format!(
                "| {} vs {} | {:.4} | {:.4} | {} |\n",
                c.var_a, c.var_b, c.r, c.p_value, c.n
            ));
        }
        md.push('\n');
    }

    // Association rules
    md.push_str("## Association Rules\n\n");
    if result.patterns.rules.is_empty() {
        md.push_str("No rules above the confidence threshold.\n\n");
    } else {
        md.push_str(&format!(
            "{} transactions, {} frequent itemsets, {} rules \
             (avg confidence {:.3}, avg lift {:.3}). Top rules by lift:\n\n",
            result.patterns.transaction_count,
            result.patterns.itemsets.len(),
            result.patterns.rules.len(),
            result.patterns.avg_confidence(),
            result.patterns.avg_lift()
        ));
        md.push_str("| Rule | Support | Confidence | Lift |\n");
        md.push_str("| --- | ---: | ---: | ---: |\n");
        for rule in result.patterns.rules.iter().take(TOP_RULES) {
            md.push_str(&format!(
                "| {} => {} | {:.3} | {:.3} | {:.3} |\n",
                rule.antecedent.join(", "),
                rule.consequent.join(", "),
                rule.support,
                rule.confidence,
                rule.lift
            ));
        }
        md.push('\n');
    }

    // Classification
    md.push_str("## Classification\n\n");
    match &result.classification {
        Some(c) => {
            md.push_str(&format!(
                "Random forest on {} training / {} test days: accuracy {:.3} \
                 (majority-class baseline {:.3}).\n\n",
                c.train_size, c.test_size, c.accuracy, c.baseline_accuracy
            ));

            md.push_str("Confusion matrix (rows actual, columns predicted):\n\n");
            md.push_str(&format!("| | {} |\n", c.class_labels.join(" | ")));
            md.push_str(&format!("| --- |{}\n", " ---: |".repeat(c.class_labels.len())));
            for (label, row) in c.class_labels.iter().zip(&c.confusion) {
                let cells: Vec<String> = row.iter().map(|n| n.to_string()).collect();
                md.push_str(&format!("| **{}** | {} |\n", label, cells.join(" | ")));
            }
            md.push('\n');

            md.push_str("| Feature | Importance |\n");
            md.push_str("| --- | ---: |\n");
            for (name, importance) in c.feature_importance.iter().take(TOP_FEATURES) {
                md.push_str(&format!("| {name} | {importance:.4} |\n"));
            }
            md.push('\n');
        }
        None => md.push_str("Skipped: too few labelled days.\n\n"),
    }

    // Clusters
    md.push_str("## Day Regimes\n\n");
    match &result.clusters {
        Some(c) => {
            md.push_str(&format!(
                "k-means found {} regimes (silhouette {:.3}):\n\n",
                c.k, c.silhouette
            ));
            md.push_str(&format!("| Cluster | Size | {} |\n", CLUSTER_COLUMNS.join(" | ")));
            md.push_str(&format!("| --- | ---: |{}\n", " ---: |".repeat(CLUSTER_COLUMNS.len())));
            for (i, profile) in c.profiles.iter().enumerate() {
                let means: Vec<String> =
                    profile.means.iter().map(|m| format!("{m:.4}")).collect();
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    i,
                    profile.size,
                    means.join(" | ")
                ));
            }
            md.push('\n');
        }
        None => md.push_str("Skipped: too few complete days.\n\n"),
    }

    // Data quality
    if !result.warnings.is_empty() {
        md.push_str("## Data Quality\n\n");
        for warning in &result.warnings {
            md.push_str(&format!("- {warning}\n"));
        }
        md.push('\n');
    }

    // Artifacts
    md.push_str("## Artifacts\n\n");
    md.push_str("- [features.csv](features.csv) — daily feature table\n");
    md.push_str("- [chart_prices.csv](chart_prices.csv) — rebased price series\n");
    md.push_str("- [chart_sentiment.csv](chart_sentiment.csv) — sentiment overlay series\n");
    md.push_str("- [manifest.json](manifest.json) — full machine-readable result\n");

    md
}
