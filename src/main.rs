/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use runtime::{RuntimeConfig, RuntimeError, Session, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input source file
    #[arg(short, long)]
    input: PathBuf,
    /// Function to call after compilation
    #[arg(short, long)]
    call: Option<String>,
    /// Arguments for `--call`, parsed according to the function's parameter types
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
    /// Write the IR, instruction listing and a hex dump of the module to this path
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Write the encoded `.wasm` module to this path
    #[arg(long)]
    emit: Option<PathBuf>,
    /// Fuel granted to each call
    #[arg(long)]
    fuel: Option<u64>,
    /// Maximum wasm stack size in bytes
    #[arg(long)]
    max_wasm_stack: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut session = Session::with_config(RuntimeConfig {
        fuel: args.fuel,
        max_wasm_stack: args.max_wasm_stack,
    })?;
    let signatures = session.define(&source).map_err(|err| {
        let location = match error_offset(&err) {
            Some(offset) => {
                let (line, column) = line_column(&source, offset);
                format!(":{}:{}", line, column)
            }
            None => String::new(),
        };
        anyhow::Error::new(err).context(format!("failed to compile {}{}", args.input.display(), location))
    })?;
    for (def, signature) in session.unit().functions().iter().zip(&signatures) {
        info!(function = %def.name, %signature, "compiled");
    }

    if let Some(path) = &args.emit {
        fs::write(path, &*session.module_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.dump {
        fs::write(path, session.debug_dump()).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let Some(name) = &args.call else {
        return Ok(());
    };
    let signature = session
        .signature(name)
        .cloned()
        .ok_or_else(|| anyhow!("no function named '{}' in {}", name, args.input.display()))?;
    if signature.params.len() != args.args.len() {
        bail!(
            "{}() takes {} argument(s) but {} were given",
            name,
            signature.params.len(),
            args.args.len()
        );
    }
    let values = args
        .args
        .iter()
        .zip(&signature.params)
        .map(|(text, ty)| Value::parse(text, *ty).ok_or_else(|| anyhow!("cannot parse '{}' as {}", text, ty)))
        .collect::<Result<Vec<_>>>()?;

    if let Some(result) = session.call(name, &values)? {
        println!("{}", result);
    }
    Ok(())
}

/// Byte offset of the source construct a definition error points at.
fn error_offset(err: &RuntimeError) -> Option<usize> {
    match err {
        RuntimeError::Compile(e) => e.span().map(|span| span.start),
        RuntimeError::Parse(e) => Some(e.span.start),
        _ => None,
    }
}

/// 1-based line and column of `offset` in `source`.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}
