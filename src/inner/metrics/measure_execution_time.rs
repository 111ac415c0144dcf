use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use metrics::KeyName;
use pin_project_lite::pin_project;

use crate::inner::metrics::StaticMetric;

pub(crate) trait Measure: Sized {
    /// Record the wall-clock time from first poll to completion into the
    /// given histogram metric.
    fn measure_execution_time(self, metric: StaticMetric) -> TimeInstrumented<Self> {
        TimeInstrumented {
            inner: self,
            started_at: None,
            key_name: KeyName::from(metric.metric_name),
        }
    }
}

impl<T: Future> Measure for T {}

pin_project! {
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub(crate) struct TimeInstrumented<F> {
        #[pin]
        inner: F,
        started_at: Option<Instant>,
        key_name: KeyName,
    }
}

impl<F: Future> Future for TimeInstrumented<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let started_at = this.started_at.get_or_insert_with(Instant::now);

        let result = this.inner.poll(cx);
        if result.is_ready() {
            metrics::histogram!(this.key_name.clone()).record(started_at.elapsed().as_millis() as f64);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::inner::metrics::CONNECTING_DURATION;

    #[tokio::test]
    async fn passes_output_through() {
        let value = async { 42usize }.measure_execution_time(CONNECTING_DURATION).await;
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn survives_multiple_polls() {
        let value = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            "done"
        }
        .measure_execution_time(CONNECTING_DURATION)
        .await;
        assert_eq!(value, "done");
    }
}
