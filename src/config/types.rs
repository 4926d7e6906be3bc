// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub headers: HeadersConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Keep-alive timeout in seconds, 0 disables keep-alive
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
    /// Per-connection timeout in seconds, 0 disables the timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Maximum concurrent connections, unlimited if not set
    #[serde(default)]
    pub max_connections: Option<u64>,
}

const fn default_keep_alive_timeout() -> u64 {
    75
}

const fn default_request_timeout() -> u64 {
    30
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: default_keep_alive_timeout(),
            request_timeout: default_request_timeout(),
            max_connections: None,
        }
    }
}

/// Security response headers attached to every response
///
/// The defaults reproduce the deployment's hardened header block; each
/// value can be overridden, and the optional headers are absent unless set.
#[derive(Debug, Deserialize, Clone)]
pub struct HeadersConfig {
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,
    #[serde(default = "default_xss_protection")]
    pub xss_protection: String,
    #[serde(default = "default_content_type_options")]
    pub content_type_options: String,
    #[serde(default = "default_content_security_policy")]
    pub content_security_policy: String,
    #[serde(default = "default_frame_options")]
    pub frame_options: String,
    #[serde(default)]
    pub access_control_allow_origin: Option<String>,
    #[serde(default)]
    pub ua_compatible: Option<String>,
}

fn default_referrer_policy() -> String {
    "no-referrer".to_string()
}

fn default_xss_protection() -> String {
    "1; mode=block".to_string()
}

fn default_content_type_options() -> String {
    "nosniff".to_string()
}

fn default_content_security_policy() -> String {
    "default-src 'none' ; style-src 'self' ; img-src 'self' ; \
     frame-ancestors 'none' ; form-action 'none' ; \
     block-all-mixed-content; reflected-xss block; referrer no-referrer"
        .to_string()
}

fn default_frame_options() -> String {
    "DENY".to_string()
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            referrer_policy: default_referrer_policy(),
            xss_protection: default_xss_protection(),
            content_type_options: default_content_type_options(),
            content_security_policy: default_content_security_policy(),
            frame_options: default_frame_options(),
            access_control_allow_origin: None,
            ua_compatible: None,
        }
    }
}

/// Site layout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Document root served over HTTP and processed by the pipeline
    #[serde(default = "default_site_root")]
    pub root: String,
    /// Site source directory (where the generator runs)
    #[serde(default = "default_site_source")]
    pub source: String,
    /// Index files tried when a directory is requested
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_site_root() -> String {
    "_site".to_string()
}

fn default_site_source() -> String {
    ".".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            source: default_site_source(),
            index_files: default_index_files(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_access_log")]
    pub access_log: bool,
    /// Access log format: combined, common, or json
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
    #[serde(default)]
    pub show_headers: bool,
}

const fn default_access_log() -> bool {
    true
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: default_access_log(),
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
            show_headers: false,
        }
    }
}

/// Build pipeline configuration
///
/// Command names are resolved through `PATH` unless given as paths. Globs
/// are relative to the document root.
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Site generator command line, run in the site source directory
    #[serde(default = "default_generator")]
    pub generator: String,
    /// PNG inputs for WebP conversion and pngcrush
    #[serde(default = "default_png_globs")]
    pub png_globs: Vec<String>,
    /// JPEG inputs for WebP conversion and EXIF stripping
    #[serde(default = "default_jpeg_globs")]
    pub jpeg_globs: Vec<String>,
    /// Compressible text artifacts for gzip and brotli
    #[serde(default = "default_compress_globs")]
    pub compress_globs: Vec<String>,
    /// Pages scanned for template tags
    #[serde(default = "default_tag_globs")]
    pub tag_globs: Vec<String>,
    /// Lossy WebP quality for JPEG sources
    #[serde(default = "default_webp_quality")]
    pub webp_quality: u8,
    /// Gzip compression level
    #[serde(default = "default_gzip_level")]
    pub gzip_level: u8,
    /// Brotli quality
    #[serde(default = "default_brotli_quality")]
    pub brotli_quality: u8,
    #[serde(default = "default_cwebp_bin")]
    pub cwebp_bin: String,
    #[serde(default = "default_pngcrush_bin")]
    pub pngcrush_bin: String,
    #[serde(default = "default_exiftool_bin")]
    pub exiftool_bin: String,
    #[serde(default = "default_gzip_bin")]
    pub gzip_bin: String,
    #[serde(default = "default_brotli_bin")]
    pub brotli_bin: String,
    /// Stylesheet compiler for integrity hashing (stdin to stdout);
    /// stylesheets are hashed as-is when not set
    #[serde(default)]
    pub scss_command: Option<String>,
}

fn default_generator() -> String {
    "jekyll build".to_string()
}

fn default_png_globs() -> Vec<String> {
    vec!["images/**/*.png".to_string()]
}

fn default_jpeg_globs() -> Vec<String> {
    vec![
        "images/**/*.jpg".to_string(),
        "images/**/*.jpeg".to_string(),
    ]
}

fn default_compress_globs() -> Vec<String> {
    vec![
        "**/*.html".to_string(),
        "**/*.css".to_string(),
        "**/*.xml".to_string(),
    ]
}

fn default_tag_globs() -> Vec<String> {
    vec!["**/*.html".to_string()]
}

const fn default_webp_quality() -> u8 {
    80
}

const fn default_gzip_level() -> u8 {
    9
}

const fn default_brotli_quality() -> u8 {
    11
}

fn default_cwebp_bin() -> String {
    "cwebp".to_string()
}

fn default_pngcrush_bin() -> String {
    "pngcrush".to_string()
}

fn default_exiftool_bin() -> String {
    "exiftool".to_string()
}

fn default_gzip_bin() -> String {
    "gzip".to_string()
}

fn default_brotli_bin() -> String {
    "brotli".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            png_globs: default_png_globs(),
            jpeg_globs: default_jpeg_globs(),
            compress_globs: default_compress_globs(),
            tag_globs: default_tag_globs(),
            webp_quality: default_webp_quality(),
            gzip_level: default_gzip_level(),
            brotli_quality: default_brotli_quality(),
            cwebp_bin: default_cwebp_bin(),
            pngcrush_bin: default_pngcrush_bin(),
            exiftool_bin: default_exiftool_bin(),
            gzip_bin: default_gzip_bin(),
            brotli_bin: default_brotli_bin(),
            scss_command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.site.root, "_site");
        assert_eq!(cfg.site.index_files, vec!["index.html".to_string()]);
        assert_eq!(cfg.pipeline.webp_quality, 80);
        assert_eq!(cfg.pipeline.gzip_level, 9);
        assert_eq!(cfg.pipeline.brotli_quality, 11);
        assert_eq!(cfg.pipeline.generator, "jekyll build");
    }

    #[test]
    fn test_default_headers() {
        let headers = HeadersConfig::default();
        assert_eq!(headers.referrer_policy, "no-referrer");
        assert_eq!(headers.xss_protection, "1; mode=block");
        assert_eq!(headers.content_type_options, "nosniff");
        assert_eq!(headers.frame_options, "DENY");
        assert!(headers
            .content_security_policy
            .starts_with("default-src 'none'"));
        assert!(headers
            .content_security_policy
            .contains("frame-ancestors 'none'"));
        assert!(headers.access_control_allow_origin.is_none());
        assert!(headers.ua_compatible.is_none());
    }
}
