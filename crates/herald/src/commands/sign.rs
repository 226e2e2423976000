//! Sign command

use anyhow::{Context, Result};
use herald_core::oauth::{sign, sign_url, Credentials, Params};

use crate::cli::SignArgs;

pub fn run(args: SignArgs) -> Result<()> {
    let credentials = Credentials::from_env().context("Cannot sign without credentials")?;

    let header = if args.query {
        sign_url(&args.method, &args.url, &credentials)?
    } else {
        let params: Params = args.params.into_iter().collect();
        let body = (!params.is_empty()).then_some(&params);
        sign(&args.method, &args.url, body, &credentials)?
    };

    tracing::debug!(method = %args.method, url = %args.url, "signed request");
    println!("{}", header);
    Ok(())
}
