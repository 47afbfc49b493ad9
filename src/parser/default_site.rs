use super::SiteFiles;

/// How much of the raw response gets embedded in the fallback page.
const PREVIEW_CHARS: usize = 1000;

const DEFAULT_STYLES: &str = "\
body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 20px;
    background-color: #f5f5f5;
}

h1 {
    color: #333;
    text-align: center;
}

pre {
    background: #fff;
    padding: 15px;
    border-radius: 5px;
    box-shadow: 0 2px 5px rgba(0,0,0,0.1);
}
";

const DEFAULT_SCRIPT: &str = "\
// Basic anti-crawler functionality
console.log('Website loaded');

// Simple rate limiting
let requestCount = 0;
const MAX_REQUESTS = 10;

function checkRateLimit() {
    requestCount++;
    if (requestCount > MAX_REQUESTS) {
        alert('Too many requests!');
        return false;
    }
    return true;
}

// User agent detection
if (navigator.userAgent.includes('bot') || navigator.userAgent.includes('crawler')) {
    console.warn('Bot detected!');
}
";

/// Synthetic three-file site used when the response contained no
/// recognizable file markers. The page embeds a preview of the raw
/// response so the run is still inspectable in a browser.
pub(super) fn build(raw_response: &str) -> SiteFiles {
    let preview: String = raw_response.chars().take(PREVIEW_CHARS).collect();

    let index = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>Test Merchant Site</title>\n\
         \x20   <link rel=\"stylesheet\" href=\"styles.css\">\n\
         </head>\n\
         <body>\n\
         \x20   <h1>Test Merchant Website</h1>\n\
         \x20   <p>Generated content:</p>\n\
         \x20   <pre>{preview}...</pre>\n\
         \x20   <script src=\"script.js\"></script>\n\
         </body>\n\
         </html>"
    );

    let mut files = SiteFiles::new();
    files.insert("index.html".to_string(), index);
    files.insert("styles.css".to_string(), DEFAULT_STYLES.to_string());
    files.insert("script.js".to_string(), DEFAULT_SCRIPT.to_string());
    files
}
