//! Static file serving module
//!
//! Resolves a request against the document root and builds the file,
//! directory listing, redirect or error response.

use crate::handler::path::{translate_path, TranslatedPath};
use crate::handler::request::RequestContext;
use crate::http::{self, body, cache, listing, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Files tried, in order, when a directory is requested
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve a request path from the document root
pub async fn serve(ctx: &RequestContext<'_>, root: &Path) -> Response<ResponseBody> {
    let translated = translate_path(root, ctx.path);

    let is_dir = fs::metadata(&translated.fs_path)
        .await
        .is_ok_and(|m| m.is_dir());
    if is_dir {
        return serve_directory(ctx, &translated).await;
    }

    // A file can't be addressed as a directory
    if translated.trailing_slash {
        return http::build_404_response("File not found", ctx.is_head);
    }

    serve_file(ctx, &translated.fs_path).await
}

/// Serve a directory: redirect to add the slash, then index file or listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    translated: &TranslatedPath,
) -> Response<ResponseBody> {
    if !translated.trailing_slash {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index in INDEX_FILES {
        let index_path = translated.fs_path.join(index);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::read_entries(&translated.fs_path).await {
        Ok(entries) => {
            let html = listing::render_listing(&translated.decoded, &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot list directory '{}': {e}",
                translated.fs_path.display()
            ));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Serve a single file, honouring `If-Modified-Since`.
///
/// The file is opened before the conditional check so an unreadable file is
/// reported as such rather than as not modified.
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<ResponseBody> {
    let file = match fs::File::open(file_path).await {
        Ok(f) => f,
        Err(e) => return io_error_response(&e, ctx.is_head),
    };

    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat file '{}': {e}",
                file_path.display()
            ));
            return io_error_response(&e, ctx.is_head);
        }
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::last_modified_value);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.if_none_match.as_deref(),
            modified,
        ) {
            return http::build_304_response(last_modified);
        }
    }

    let len = metadata.len();
    let content = if ctx.is_head {
        body::empty()
    } else {
        body::file(file, len)
    };

    http::build_file_response(
        content,
        len,
        mime::guess_content_type(file_path),
        last_modified.as_deref(),
    )
}

/// Map a filesystem error to the client-facing status
fn io_error_response(err: &io::Error, is_head: bool) -> Response<ResponseBody> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => http::build_403_response(is_head),
        _ => http::build_404_response("File not found", is_head),
    }
}
