//! Progress tracking for imports

use super::source::{ImportStats, SkipReason};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// How often (in records) the spinner message is refreshed
const MESSAGE_INTERVAL: usize = 1000;

/// Progress tracker for one import run
pub struct ImportProgress {
    /// Progress bar (None if running in quiet mode)
    progress_bar: Option<ProgressBar>,
    start_time: Instant,
    stats: ImportStats,
}

impl ImportProgress {
    pub fn new(source_name: &str, dry_run: bool, quiet: bool) -> Self {
        let progress_bar = if !quiet {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb.set_message(format!("| {}", source_name));
            Some(pb)
        } else {
            None
        };

        Self {
            progress_bar,
            start_time: Instant::now(),
            stats: ImportStats {
                dry_run,
                ..ImportStats::default()
            },
        }
    }

    fn tick(&self) {
        if let Some(ref pb) = self.progress_bar {
            let processed = self.stats.records_processed;
            pb.set_position(processed as u64);
            if processed % MESSAGE_INTERVAL == 0 {
                let elapsed = self.start_time.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    processed as f64 / elapsed
                } else {
                    0.0
                };
                pb.set_message(format!(
                    "| {:.0} rec/s | {} skipped",
                    rate, self.stats.records_skipped
                ));
            }
        }
    }

    /// A record was extracted; `dropped` translation entries were discarded
    pub fn record_extracted(&mut self, dropped: usize) {
        self.stats.records_processed += 1;
        self.stats.records_extracted += 1;
        self.stats.translations_dropped += dropped;
        self.tick();
    }

    /// A record was skipped
    pub fn record_skipped(&mut self, reason: SkipReason) {
        self.stats.records_processed += 1;
        self.stats.records_skipped += 1;
        *self.stats.skip_reasons.entry(reason).or_insert(0) += 1;
        self.tick();
    }

    /// An extracted record did not touch any bridge
    pub fn record_ignored(&mut self) {
        self.stats.records_ignored += 1;
    }

    /// Mutable access for the later pipeline stages
    pub fn stats_mut(&mut self) -> &mut ImportStats {
        &mut self.stats
    }

    /// Announce a pipeline stage on the spinner
    pub fn stage(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(format!("| {}", message));
        }
    }

    /// Current statistics
    pub fn get_stats(&self) -> ImportStats {
        let mut stats = self.stats.clone();
        stats.elapsed_seconds = self.start_time.elapsed().as_secs_f64();
        stats.update_rate();
        stats
    }

    /// Finish the progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            let stats = self.get_stats();
            pb.finish_with_message(format!(
                "| done: {} extracted, {} skipped, {:.0} rec/s",
                stats.records_extracted, stats.records_skipped, stats.records_per_second
            ));
        }
    }

    /// Abandon the spinner after a fatal error
    pub fn abandon(&self, reason: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.abandon_with_message(format!("| failed: {}", reason));
        }
    }
}

/// Print an end-of-run summary to stdout
pub fn print_summary(stats: &ImportStats) {
    let mode = if stats.dry_run { " (DRY RUN)" } else { "" };

    println!("\nImport Summary{}", mode);
    println!("==============");
    println!("Records processed:          {}", stats.records_processed);
    println!("Records extracted:          {}", stats.records_extracted);
    println!("Records skipped:            {}", stats.records_skipped);
    for (reason, count) in &stats.skip_reasons {
        println!("  {:<24}  {}", reason.to_string(), count);
    }
    println!("Records outside bridge:     {}", stats.records_ignored);
    println!("Translations dropped:       {}", stats.translations_dropped);
    println!("Bridge headwords:           {}", stats.bridge_headwords);
    println!("  with both sides:          {}", stats.bridge_headwords_complete);
    println!("Foreign headwords:          {}", stats.foreign_headwords);
    println!("Bridge words:               {}", stats.bridge_words);
    println!("  linked:                   {}", stats.bridge_words_linked);
    println!("  partial (dropped):        {}", stats.bridge_words_partial);
    println!("Links derived:              {}", stats.links_derived());
    println!("  source -> bridge:         {}", stats.source_bridge_links);
    println!("  bridge -> target:         {}", stats.bridge_target_links);
    println!("  source -> target:         {}", stats.source_target_links);
    println!("  target -> source:         {}", stats.target_source_links);
    println!("Words resolved:             {}", stats.words_resolved);
    println!("Translation edges written:  {}", stats.edges_written);
    if stats.dry_run {
        println!("Rows inserted:              0 (dry run)");
    } else {
        println!("Word rows inserted:         {}", stats.words_inserted);
        println!("Translation rows inserted:  {}", stats.edges_inserted);
    }
    println!("Elapsed time:               {:.1}s", stats.elapsed_seconds);
    println!("Processing rate:            {:.1} rec/s", stats.records_per_second);
}
