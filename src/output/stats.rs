//! Terminal summaries for crawl and extraction runs

use crate::crawler::CrawlReport;
use crate::extract::ExtractionSummary;
use std::time::Duration;

/// Totals over a batch of crawl reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub seeds: usize,
    pub crawled: usize,
    pub found: usize,
    pub errors: usize,
    pub dropped: usize,
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_reports(reports: &[CrawlReport]) -> Self {
        reports.iter().fold(Self::default(), |mut acc, report| {
            acc.seeds += 1;
            acc.crawled += report.crawled;
            acc.found += report.urls.len();
            acc.errors += report.errors;
            acc.dropped += report.dropped;
            acc.elapsed += report.elapsed;
            acc
        })
    }
}

/// Prints one block per seed followed by the batch totals
pub fn print_batch_summary(reports: &[CrawlReport]) {
    println!("=== Crawl Summary ===\n");

    for report in reports {
        println!("{}", report.seed);
        println!("  Crawled: {} URLs", report.crawled);
        println!("  Found: {} URLs", report.urls.len());
        if report.errors > 0 {
            println!("  Errors: {}", report.errors);
        }
        if report.dropped > 0 {
            println!("  Over limit: {}", report.dropped);
        }
        println!("  Done in {:.2}s", report.elapsed.as_secs_f64());
        println!();
    }

    let stats = CrawlStatistics::from_reports(reports);
    println!(
        "Total: {} seeds, {} crawled, {} found, {} errors in {:.2}s",
        stats.seeds,
        stats.crawled,
        stats.found,
        stats.errors,
        stats.elapsed.as_secs_f64()
    );
}

/// Prints the outcome of an extraction batch
pub fn print_extraction_summary(summary: &ExtractionSummary) {
    println!("=== Extraction Summary ===\n");
    println!("  Pages processed: {}", summary.processed);
    println!("  Files written: {}", summary.written);
    println!("  Below minimum length: {}", summary.too_short);
    println!("  Failures: {}", summary.failed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(crawled: usize, found: usize, errors: usize) -> CrawlReport {
        CrawlReport {
            seed: "http://example.com/".to_string(),
            host: "example.com".to_string(),
            urls: (0..found).map(|i| format!("http://example.com/{}", i)).collect(),
            crawled,
            errors,
            dropped: 0,
            elapsed: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_statistics_from_reports() {
        let stats = CrawlStatistics::from_reports(&[report(3, 5, 1), report(2, 2, 0)]);

        assert_eq!(stats.seeds, 2);
        assert_eq!(stats.crawled, 5);
        assert_eq!(stats.found, 7);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.elapsed, Duration::from_secs(1));
    }

    #[test]
    fn test_statistics_empty() {
        assert_eq!(CrawlStatistics::from_reports(&[]), CrawlStatistics::default());
    }
}
