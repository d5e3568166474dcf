//! # Storefront Shell Entry Point
//!
//! ```text
//! $ storefront
//! home
//! {"featured":[...],"categories":["All","Laptops",...]}
//! add 5 2
//! {"lines":[...],"totals":{"itemCount":1,"totalItems":2,...}}
//! checkout
//! {"state":"in_progress","progress":0.0,...}
//! wait
//! {"outcome":{"status":"completed","detail":{...}},"message":"Your order has been placed successfully!"}
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_shell::init_tracing();

    match storefront_shell::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Shell failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
