use anyhow::{Context, Result};
use clap::Parser;
use parquetize::config::Cli;
use parquetize::io::cloud::S3ObjectIO;
use parquetize::logging::init_logging;
use parquetize::run_job;
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let store = S3ObjectIO::new(cli.s3_settings()).context("create S3 client")?;
    match run_job(&store, &cli.source, &cli.destination, &cli.job_config()) {
        Ok(report) => {
            info!(
                job_id = %report.job_id,
                format = %report.format,
                rows = report.rows,
                columns = report.columns,
                bytes_downloaded = report.bytes_downloaded,
                bytes_uploaded = report.bytes_uploaded,
                "conversion complete"
            );
            Ok(())
        }
        Err(err) => {
            let err = anyhow::Error::from(err);
            error!("job failed: {err:#}");
            Err(err)
        }
    }
}
