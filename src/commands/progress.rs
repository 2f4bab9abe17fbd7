//! Terminal progress bars for review fetching

use indicatif::{ProgressBar, ProgressStyle};

use bangumi_score::review::{ProgressObserver, ReviewKind};

/// One progress bar per review kind, sized by the reported total
pub struct BarProgress {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }
}

impl ProgressObserver for BarProgress {
    fn on_start(&mut self, kind: ReviewKind, total: Option<u64>) {
        if self.quiet {
            return;
        }

        let pb = match total {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_prefix(kind.display_name());

        self.progress_bar = Some(pb);
    }

    fn on_progress(&mut self, _kind: ReviewKind, fetched: u64) {
        if let Some(ref pb) = self.progress_bar {
            // the reported total can lag behind newly posted reviews
            if pb.length().is_some_and(|len| fetched > len) {
                pb.set_length(fetched);
            }
            pb.set_position(fetched);
        }
    }

    fn on_finish(&mut self, kind: ReviewKind, fetched: u64) {
        if let Some(pb) = self.progress_bar.take() {
            pb.set_position(fetched);
            pb.finish_with_message(format!("{} {fetched}", kind.display_name()));
        }
    }
}
