//! Read-only preview server.
//!
//! Serves resolved artifacts under the project root until terminated.
//! Resolution is stateless and recomputed per request, so responses always
//! reflect the current disk state.

mod lifecycle;
mod path;
mod response;

use crate::{config::PreviewConfig, core, log};
use anyhow::Result;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Bind and serve until Ctrl+C.
pub fn run_server(config: Arc<PreviewConfig>) -> Result<()> {
    let (server, addr) = lifecycle::bind(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    core::register_server(Arc::clone(&server));

    log!("serve"; "serving {} at http://{}", config.root.display(), addr);

    run_request_loop(&server, &config);
    Ok(())
}

fn run_request_loop(server: &Server, config: &Arc<PreviewConfig>) {
    // Thread pool so one slow read cannot block other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &PreviewConfig) -> Result<()> {
    if core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match path::resolve_request(request.url(), &config.root) {
        Ok(Some(artifact)) => response::respond_file(request, &artifact),
        Ok(None) => response::respond_not_found(request),
        // Unexpected filesystem failure, distinct from a plain miss
        Err(e) => Err(e.into()),
    }
}
