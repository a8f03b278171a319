//! Named transfer metrics readable after each request.
//!
//! The metric set mirrors what a libcurl-style engine reports per transfer.
//! Metrics a given engine cannot observe still answer with a zero or empty
//! value rather than disappearing from the map, so callers can rely on a
//! fixed key set.

/// One named transfer metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    EffectiveUrl,
    HttpCode,
    TotalTime,
    NamelookupTime,
    ConnectTime,
    PretransferTime,
    RedirectTime,
    RedirectCount,
    SizeUpload,
    SizeDownload,
    SpeedUpload,
    HeaderSize,
    RequestSize,
    ContentLengthDownload,
    ContentLengthUpload,
    ContentType,
    ResponseCode,
    SpeedDownload,
    SslVerifyResult,
    Filetime,
    StarttransferTime,
    HttpConnectCode,
    HttpAuthAvail,
    ProxyAuthAvail,
    OsErrno,
    NumConnects,
    SslEngines,
    FtpEntryPath,
    CookieList,
}

impl Metric {
    /// Every metric, in the order `Client::info` reports them.
    pub const ALL: [Metric; 29] = [
        Metric::EffectiveUrl,
        Metric::HttpCode,
        Metric::TotalTime,
        Metric::NamelookupTime,
        Metric::ConnectTime,
        Metric::PretransferTime,
        Metric::RedirectTime,
        Metric::RedirectCount,
        Metric::SizeUpload,
        Metric::SizeDownload,
        Metric::SpeedUpload,
        Metric::HeaderSize,
        Metric::RequestSize,
        Metric::ContentLengthDownload,
        Metric::ContentLengthUpload,
        Metric::ContentType,
        Metric::ResponseCode,
        Metric::SpeedDownload,
        Metric::SslVerifyResult,
        Metric::Filetime,
        Metric::StarttransferTime,
        Metric::HttpConnectCode,
        Metric::HttpAuthAvail,
        Metric::ProxyAuthAvail,
        Metric::OsErrno,
        Metric::NumConnects,
        Metric::SslEngines,
        Metric::FtpEntryPath,
        Metric::CookieList,
    ];

    /// The dash-separated name used as the key in `Client::info`.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::EffectiveUrl => "effective-url",
            Metric::HttpCode => "http-code",
            Metric::TotalTime => "total-time",
            Metric::NamelookupTime => "namelookup-time",
            Metric::ConnectTime => "connect-time",
            Metric::PretransferTime => "pretransfer-time",
            Metric::RedirectTime => "redirect-time",
            Metric::RedirectCount => "redirect-count",
            Metric::SizeUpload => "size-upload",
            Metric::SizeDownload => "size-download",
            Metric::SpeedUpload => "speed-upload",
            Metric::HeaderSize => "header-size",
            Metric::RequestSize => "request-size",
            Metric::ContentLengthDownload => "content-length-download",
            Metric::ContentLengthUpload => "content-length-upload",
            Metric::ContentType => "content-type",
            Metric::ResponseCode => "response-code",
            Metric::SpeedDownload => "speed-download",
            Metric::SslVerifyResult => "ssl-verifyresult",
            Metric::Filetime => "filetime",
            Metric::StarttransferTime => "starttransfer-time",
            Metric::HttpConnectCode => "http-connectcode",
            Metric::HttpAuthAvail => "httpauth-avail",
            Metric::ProxyAuthAvail => "proxyauth-avail",
            Metric::OsErrno => "os-errno",
            Metric::NumConnects => "num-connects",
            Metric::SslEngines => "ssl-engines",
            Metric::FtpEntryPath => "ftp-entry-path",
            Metric::CookieList => "cookielist",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of one metric.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

impl InfoValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            InfoValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            InfoValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            InfoValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for InfoValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfoValue::Str(v) => f.write_str(v),
            InfoValue::Int(v) => write!(f, "{v}"),
            InfoValue::Float(v) => write!(f, "{v}"),
            InfoValue::List(v) => f.write_str(&v.join(", ")),
        }
    }
}
