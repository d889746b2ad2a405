/// Connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    repeat_close_notify: bool,
    flush_after_alert: bool,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            repeat_close_notify: true,
            flush_after_alert: true,
        }
    }

    /// Whether another close_notify may be queued after one was sent.
    ///
    /// Any other alert is always refused once close_notify went out.
    #[inline(always)]
    pub fn repeat_close_notify(&self) -> bool {
        self.repeat_close_notify
    }

    /// Whether to flush the transport after an alert record is written.
    ///
    /// The flush is best effort. A failing flush never fails the alert.
    #[inline(always)]
    pub fn flush_after_alert(&self) -> bool {
        self.flush_after_alert
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    repeat_close_notify: bool,
    flush_after_alert: bool,
}

impl ConfigBuilder {
    /// Set whether another close_notify may be queued after one was sent.
    ///
    /// Defaults to true.
    pub fn repeat_close_notify(mut self, allow: bool) -> Self {
        self.repeat_close_notify = allow;
        self
    }

    /// Set whether to flush the transport after writing an alert.
    ///
    /// Defaults to true.
    pub fn flush_after_alert(mut self, flush: bool) -> Self {
        self.flush_after_alert = flush;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        Config {
            repeat_close_notify: self.repeat_close_notify,
            flush_after_alert: self.flush_after_alert,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}
