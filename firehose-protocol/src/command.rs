use std::fmt;

/// A category of downlink message that can be requested with `events`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Event {
    /// Position reports.
    Position,
}

impl Event {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "position",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude bounding box for the `latlong` directive.
///
/// Bounds are passed through as given; inverted or degenerate boxes are
/// left for the server to interpret.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub low_lat: f64,
    pub low_lon: f64,
    pub hi_lat: f64,
    pub hi_lon: f64,
}

impl Rectangle {
    pub fn new(low_lat: f64, low_lon: f64, hi_lat: f64, hi_lon: f64) -> Self {
        Self {
            low_lat,
            low_lon,
            hi_lat,
            hi_lon,
        }
    }
}

/// Start and end of a `range` request, both in POSIX epoch format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PitrRange {
    pub start: String,
    pub end: String,
}

impl PitrRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Connection initiation command, sent once as the first line of a session.
///
/// Serialization goes through [`Display`](fmt::Display), so
/// `command.to_string()` yields the line without its terminator.
///
/// `live`, `pitr` and `range` are not checked for mutual exclusion. Whatever
/// combination is set is emitted and the server decides how to treat it.
///
/// ```
/// use firehose_rs_protocol::{Event, InitCommand, Rectangle};
///
/// let cmd = InitCommand::new("un", "pw")
///     .live()
///     .event(Event::Position)
///     .latlong(Rectangle::new(1.0, 2.0, 3.0, 4.0));
/// assert_eq!(
///     cmd.to_string(),
///     r#"live username un password pw events "position" latlong "1.000000 2.000000 3.000000 4.000000""#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitCommand {
    /// Request data from the present time forward.
    pub live: bool,
    /// Resume from this point-in-time-recovery value, then continue live.
    /// Empty means not set.
    pub pitr: String,
    /// Request data between two times; the server disconnects after the
    /// last message in the range.
    pub range: Option<PitrRange>,
    /// Account username.
    pub username: String,
    /// Firehose API key (usually not the account password).
    pub password: String,
    /// Airport glob patterns, e.g. `"CYUL"` or `"K???"`.
    pub airport_filter: Vec<String>,
    /// Message kinds to deliver. Empty means the subscription default.
    pub events: Vec<Event>,
    /// Bounding boxes; each one is sent as its own `latlong` directive.
    pub latlong: Vec<Rectangle>,
}

impl InitCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn live(mut self) -> Self {
        self.live = true;
        self
    }

    pub fn pitr(mut self, pitr: impl Into<String>) -> Self {
        self.pitr = pitr.into();
        self
    }

    pub fn range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.range = Some(PitrRange::new(start, end));
        self
    }

    pub fn airport(mut self, glob: impl Into<String>) -> Self {
        self.airport_filter.push(glob.into());
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn latlong(mut self, rect: Rectangle) -> Self {
        self.latlong.push(rect);
        self
    }

    fn tokens(&self) -> Vec<String> {
        let mut parts = Vec::new();

        if self.live {
            parts.push("live".to_owned());
        }

        if !self.pitr.is_empty() {
            parts.push("pitr".to_owned());
            parts.push(self.pitr.clone());
        }

        if let Some(range) = &self.range {
            parts.push("range".to_owned());
            parts.push(range.start.clone());
            parts.push(range.end.clone());
        }

        // Credentials are mandatory on the wire, even when empty.
        parts.push("username".to_owned());
        parts.push(self.username.clone());
        parts.push("password".to_owned());
        parts.push(self.password.clone());

        if !self.airport_filter.is_empty() {
            parts.push("airport_filter".to_owned());
            parts.push(quoted(&self.airport_filter.join(" ")));
        }

        if !self.events.is_empty() {
            let names: Vec<&str> = self.events.iter().map(Event::as_str).collect();
            parts.push("events".to_owned());
            parts.push(quoted(&names.join(" ")));
        }

        for rect in &self.latlong {
            parts.push("latlong".to_owned());
            parts.push(format!(
                "\"{:.6} {:.6} {:.6} {:.6}\"",
                rect.low_lat, rect.low_lon, rect.hi_lat, rect.hi_lon
            ));
        }

        parts
    }
}

impl fmt::Display for InitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}
