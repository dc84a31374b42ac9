use indicatif::{HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Bar style used while objects or deltas are transferred.
/// - Yellow spinner, the remote URI as prefix, then a bar and a free-form message.
fn transfer_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "\x1b[33m{spinner}\x1b[0m {prefix} [{bar:24}] {pos}/{len} {wide_msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

/// Counters copied out of a libgit2 `Progress` callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub received_objects: usize,
    pub total_objects: usize,
    pub indexed_deltas: usize,
    pub total_deltas: usize,
    pub received_bytes: usize,
}

impl From<&git2::Progress<'_>> for TransferStats {
    fn from(p: &git2::Progress<'_>) -> Self {
        Self {
            received_objects: p.received_objects(),
            total_objects: p.total_objects(),
            indexed_deltas: p.indexed_deltas(),
            total_deltas: p.total_deltas(),
            received_bytes: p.received_bytes(),
        }
    }
}

/// Clone/fetch progress rendered on stderr.
///
/// Standalone calls draw directly to stderr; batch sync passes its
/// `MultiProgress` so transfer bars stack under the job spinners.
#[derive(Clone)]
pub struct TransferProgress {
    pb: ProgressBar,
}

impl TransferProgress {
    pub fn start(label: &str, multi: Option<&MultiProgress>) -> Self {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let pb = match multi {
            Some(mp) => mp.add(pb),
            None => pb,
        };
        pb.set_style(transfer_style());
        pb.set_prefix(label.to_string());
        pb.set_message("connecting");
        Self { pb }
    }

    /// Feed a transfer progress snapshot.
    ///
    /// Object reception comes first; once every object has arrived the bar
    /// switches over to delta resolution.
    pub fn on_transfer(&self, stats: TransferStats) {
        if stats.received_objects < stats.total_objects || stats.total_deltas == 0 {
            self.pb.set_length(stats.total_objects as u64);
            self.pb.set_position(stats.received_objects as u64);
            self.pb.set_message(format!(
                "receiving objects ({})",
                HumanBytes(stats.received_bytes as u64)
            ));
        } else {
            self.pb.set_length(stats.total_deltas as u64);
            self.pb.set_position(stats.indexed_deltas as u64);
            self.pb.set_message("resolving deltas");
        }
    }

    /// Show a sideband line sent by the remote ("Counting objects: ...").
    pub fn on_sideband(&self, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        if let Some(line) = text.rsplit(['\r', '\n']).map(str::trim).find(|s| !s.is_empty()) {
            self.pb.set_message(format!("remote: {line}"));
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
