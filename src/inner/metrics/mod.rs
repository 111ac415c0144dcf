use metrics::Unit;

pub(crate) mod measure_execution_time;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

pub(crate) struct StaticMetric {
    pub(crate) metric_name: &'static str,
    unit: Unit,
    description: &'static str,
    metric_type: MetricType,
}

impl StaticMetric {
    fn describe(&self) {
        match self.metric_type {
            MetricType::Counter => {
                metrics::describe_counter!(self.metric_name, self.unit, self.description)
            }
            MetricType::Gauge => {
                metrics::describe_gauge!(self.metric_name, self.unit, self.description)
            }
            MetricType::Histogram => {
                metrics::describe_histogram!(self.metric_name, self.unit, self.description)
            }
        }
    }

    pub(crate) fn increment(&self) {
        match self.metric_type {
            MetricType::Counter => metrics::counter!(self.metric_name).increment(1),
            _ => panic!("Metric type mismatch"),
        }
    }

    pub(crate) fn gauge(&self, value: f64) {
        match self.metric_type {
            MetricType::Gauge => metrics::gauge!(self.metric_name).set(value),
            _ => panic!("Metric type mismatch"),
        }
    }
}

pub(crate) const CONNECTIONS_REQUESTED: StaticMetric = StaticMetric {
    metric_name: "connector.connection.requested.count",
    unit: Unit::Count,
    description: "The number of connection requests received",
    metric_type: MetricType::Counter,
};

pub(crate) const CONNECTIONS_REJECTED: StaticMetric = StaticMetric {
    metric_name: "connector.connection.rejected.count",
    unit: Unit::Count,
    description: "The number of connection requests rejected by admission control",
    metric_type: MetricType::Counter,
};

pub(crate) const CONNECTIONS_ESTABLISHED: StaticMetric = StaticMetric {
    metric_name: "connector.connection.established.count",
    unit: Unit::Count,
    description: "The number of connections established",
    metric_type: MetricType::Counter,
};

pub(crate) const CONNECTING_ERRORS: StaticMetric = StaticMetric {
    metric_name: "connector.connection.error.count",
    unit: Unit::Count,
    description: "The number of failed connection attempts",
    metric_type: MetricType::Counter,
};

pub(crate) const CONNECTIONS_ABORTED: StaticMetric = StaticMetric {
    metric_name: "connector.connection.aborted.count",
    unit: Unit::Count,
    description: "The number of connection attempts abandoned by a disconnect",
    metric_type: MetricType::Counter,
};

pub(crate) const CONNECTIONS_DROPPED: StaticMetric = StaticMetric {
    metric_name: "connector.connection.dropped.count",
    unit: Unit::Count,
    description: "The number of completed disconnections",
    metric_type: MetricType::Counter,
};

pub(crate) const STALE_COMPLETIONS_DISCARDED: StaticMetric = StaticMetric {
    metric_name: "connector.completion.stale.count",
    unit: Unit::Count,
    description: "The number of transport completions discarded as stale",
    metric_type: MetricType::Counter,
};

pub(crate) const ENGAGED_PERIPHERALS: StaticMetric = StaticMetric {
    metric_name: "connector.peripheral.engaged.count",
    unit: Unit::Count,
    description: "The number of peripherals currently connecting or connected",
    metric_type: MetricType::Gauge,
};

pub(crate) const CONNECTING_DURATION: StaticMetric = StaticMetric {
    metric_name: "connector.peripheral.connecting.duration",
    unit: Unit::Milliseconds,
    description: "The time spent connecting a peripheral",
    metric_type: MetricType::Histogram,
};

pub(crate) const DISCONNECTING_DURATION: StaticMetric = StaticMetric {
    metric_name: "connector.peripheral.disconnecting.duration",
    unit: Unit::Milliseconds,
    description: "The time between a disconnect call and the transport acknowledgment",
    metric_type: MetricType::Histogram,
};

/// Register metric metadata with the installed recorder. Call once after
/// recorder installation; without a recorder all metrics are no-ops.
pub fn describe_metrics() {
    CONNECTIONS_REQUESTED.describe();
    CONNECTIONS_REJECTED.describe();
    CONNECTIONS_ESTABLISHED.describe();
    CONNECTING_ERRORS.describe();
    CONNECTIONS_ABORTED.describe();
    CONNECTIONS_DROPPED.describe();
    STALE_COMPLETIONS_DISCARDED.describe();
    ENGAGED_PERIPHERALS.describe();
    CONNECTING_DURATION.describe();
    DISCONNECTING_DURATION.describe();
}
