mod app;
mod entry;
mod logger;

use logstress::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
