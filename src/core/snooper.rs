use crate::domain::ports::{Notifier, PageFetcher, SnoopedElectionStore, Snooper};
use crate::utils::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnoopReport {
    pub snooper_name: String,
    pub created: usize,
    pub updated: usize,
}

/// fetch -> parse -> upsert -> notify，一次跑一個 snooper
pub struct SnoopEngine<F: PageFetcher, S: SnoopedElectionStore, N: Notifier> {
    fetcher: F,
    store: S,
    notifier: N,
}

impl<F: PageFetcher, S: SnoopedElectionStore, N: Notifier> SnoopEngine<F, S, N> {
    pub fn new(fetcher: F, store: S, notifier: N) -> Self {
        Self {
            fetcher,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run<P: Snooper>(&self, snooper: &P) -> Result<SnoopReport> {
        let url = snooper.listing_url();
        tracing::info!("🔎 {}: fetching {}", snooper.snooper_name(), url);

        let html = self.fetcher.get_page(&url).await?;
        let tiles = snooper.parse_listing(&html)?;
        tracing::info!("🔎 {}: found {} entries", snooper.snooper_name(), tiles.len());

        let mut report = SnoopReport {
            snooper_name: snooper.snooper_name().to_string(),
            ..SnoopReport::default()
        };

        // 第一個解析錯誤就中止，前面已寫入的紀錄保留
        for tile in tiles {
            let entry = tile?;
            tracing::debug!("📄 {}: {}", snooper.snooper_name(), entry.detail_url);

            let (item, created) = self.store.update_or_create(entry).await?;
            if created {
                tracing::info!("🆕 New election found: {}", item.title);
                report.created += 1;
                // 通知失敗不回滾已寫入的紀錄，但本次 snoop 到此為止
                if let Err(e) = self.notifier.post(&item).await {
                    tracing::error!(
                        "📭 {}: notification for {} failed, run stopped after {} created / {} updated",
                        report.snooper_name,
                        item.detail_url,
                        report.created,
                        report.updated
                    );
                    return Err(e);
                }
            } else {
                report.updated += 1;
            }
        }

        tracing::info!(
            "✅ {}: {} created, {} updated",
            report.snooper_name,
            report.created,
            report.updated
        );
        Ok(report)
    }
}
