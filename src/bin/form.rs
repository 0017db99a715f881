//! codebase-merger-form: interactive form front-end for codebase-merger

use anyhow::Result;

fn main() -> Result<()> {
    codebase_merger::form::run()
}
