//! Shared test utilities used across the dbscan crates.

pub mod tracing {
    //! Recording layer for capturing spans and events in tests.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    /// Layer that keeps every closed span and emitted event so tests can
    /// assert on instrumentation after the fact.
    ///
    /// # Examples
    /// ```
    /// use dbscan_test_support::tracing::RecordingLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     let _span = tracing::info_span!("dbscan.run", points = 3_u64).entered();
    ///     tracing::warn!("provider was built for a different dataset; rebuilding");
    /// });
    ///
    /// let span = layer.span("dbscan.run");
    /// assert_eq!(span.as_ref().and_then(|s| s.field("points")), Some("3"));
    /// assert!(layer.has_event(tracing::Level::WARN, "provider was built for a different dataset; rebuilding"));
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    impl RecordingLayer {
        /// Closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            lock(&self.spans).clone()
        }

        /// Emitted events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            lock(&self.events).clone()
        }

        /// Returns the first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            lock(&self.spans).iter().find(|span| span.name == name).cloned()
        }

        /// Counts closed spans called `name`.
        #[must_use]
        pub fn span_count(&self, name: &str) -> usize {
            lock(&self.spans).iter().filter(|span| span.name == name).count()
        }

        /// Returns events at `level` whose message equals `message`.
        #[must_use]
        pub fn events_with(&self, level: Level, message: &str) -> Vec<EventRecord> {
            lock(&self.events)
                .iter()
                .filter(|event| event.level == level && event.message() == Some(message))
                .cloned()
                .collect()
        }

        /// Returns whether an event at `level` carried `message`.
        #[must_use]
        pub fn has_event(&self, level: Level, message: &str) -> bool {
            !self.events_with(level, message).is_empty()
        }
    }

    /// Snapshot of a closed span.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name captured from the tracing metadata.
        pub name: String,
        /// Structured fields recorded against the span.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Returns the rendered value of `field`.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// Snapshot of an emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Log level associated with the event.
        pub level: Level,
        /// Event target extracted from the metadata.
        pub target: String,
        /// Structured fields attached to the event, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Returns the rendered value of `field`.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }

        /// Returns the event message.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }
    }

    #[derive(Default)]
    struct SpanData {
        name: String,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            id: &tracing::span::Id,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut data = SpanData {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut FieldRecorder(&mut data.fields));
            span.extensions_mut().insert(data);
        }

        fn on_record(
            &self,
            id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(data) = extensions.get_mut::<SpanData>() {
                values.record(&mut FieldRecorder(&mut data.fields));
            }
        }

        fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(data) = span.extensions_mut().remove::<SpanData>() else {
                return;
            };
            lock(&self.spans).push(SpanRecord {
                name: data.name,
                fields: data.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldRecorder(&mut fields));
            lock(&self.events).push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
        }
    }

    /// Renders every field value as a string.
    struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

    impl FieldRecorder<'_> {
        fn insert(&mut self, field: &Field, value: String) {
            self.0.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldRecorder<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.insert(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.insert(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.insert(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.insert(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.insert(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.insert(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.insert(field, value.to_string());
        }
    }
}

pub mod fixtures {
    //! Deterministic point clouds shared by tests and benchmarks.

    use rand::{Rng, SeedableRng, rngs::SmallRng};

    /// Two tight 2-D blobs of five points each plus one distant outlier.
    ///
    /// With radius `2` and `min_neighbours = 4` the blobs form clusters `0`
    /// (ids `0..5`) and `1` (ids `5..10`) and id `10` is noise.
    ///
    /// # Examples
    /// ```
    /// let points = dbscan_test_support::fixtures::two_blobs_with_outlier();
    /// assert_eq!(points.len(), 11);
    /// ```
    #[must_use]
    pub fn two_blobs_with_outlier() -> Vec<Vec<f32>> {
        let offsets = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (-0.5, 0.0), (0.0, -0.5)];
        let mut points = Vec::with_capacity(offsets.len() * 2 + 1);
        for (cx, cy) in [(0.0_f32, 0.0_f32), (10.0, 10.0)] {
            points.extend(offsets.iter().map(|(dx, dy)| vec![cx + dx, cy + dy]));
        }
        points.push(vec![50.0, -50.0]);
        points
    }

    /// Twenty points around `(0, 0)`, twenty around `(100, 100)` and an
    /// outlier at `(50, 50)`.
    ///
    /// Each blob is a 5 x 4 grid with `0.15` spacing, so every pairwise
    /// distance inside a blob is below `1`. The outlier has id `40`.
    ///
    /// # Examples
    /// ```
    /// let points = dbscan_test_support::fixtures::dense_blobs_with_outlier();
    /// assert_eq!(points.len(), 41);
    /// assert_eq!(points[40], [50.0, 50.0]);
    /// ```
    #[must_use]
    pub fn dense_blobs_with_outlier() -> Vec<Vec<f32>> {
        let mut points = Vec::with_capacity(41);
        for centre in [0.0_f32, 100.0] {
            for row in 0..4_u8 {
                for col in 0..5_u8 {
                    let dx = (f32::from(col) - 2.0) * 0.15;
                    let dy = (f32::from(row) - 1.5) * 0.15;
                    points.push(vec![centre + dx, centre + dy]);
                }
            }
        }
        points.push(vec![50.0, 50.0]);
        points
    }

    /// Synthetic blobs with uniform jitter around evenly spaced centres.
    ///
    /// Produces `blobs * per_blob` points in `dimensions` dimensions. Blob
    /// centres sit `spacing` apart along the first axis and every component
    /// is jittered uniformly in `[-1, 1)`, reproducibly for a fixed `seed`.
    ///
    /// # Examples
    /// ```
    /// let points = dbscan_test_support::fixtures::jittered_blobs(3, 10, 2, 20.0, 7);
    /// assert_eq!(points.len(), 30);
    /// assert!(points.iter().all(|point| point.len() == 2));
    /// ```
    #[must_use]
    pub fn jittered_blobs(
        blobs: usize,
        per_blob: usize,
        dimensions: usize,
        spacing: f32,
        seed: u64,
    ) -> Vec<Vec<f32>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut points = Vec::with_capacity(blobs * per_blob);
        for blob in 0..blobs {
            let centre = blob as f32 * spacing;
            for _ in 0..per_blob {
                let mut point: Vec<f32> =
                    (0..dimensions).map(|_| rng.gen_range(-1.0_f32..1.0)).collect();
                if let Some(first) = point.first_mut() {
                    *first += centre;
                }
                points.push(point);
            }
        }
        points
    }
}

pub mod ci;
