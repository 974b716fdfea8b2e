mod common;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use zstream_core::{
        constants::{DEFAULT_LEVEL_ZSTD, MAX_WRITE_SIZE},
        telemetry::{Stage, StageTimes, TelemetryCounters},
        CompressionParams, IncrementalCompressor, ScopeExit, StoredEngine, StreamCompressor, StreamConfig,
        StreamError,
    };

    use crate::common::{decode_stored, sample_data};

    // --- Config ---

    #[test]
    fn default_config_values() {
        let config = StreamConfig::default();
        assert_eq!(config.params.level, DEFAULT_LEVEL_ZSTD);
        assert!(!config.params.write_checksum);
        assert!(config.params.write_content_size);
        assert_eq!(config.params.window_log, None);
        assert_eq!(config.source_size, None);
        assert_eq!(config.write_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_missing_fields_use_defaults() {
        let config = StreamConfig::from_json(r#"{"params":{"level":9},"write_size":4096}"#).unwrap();
        assert_eq!(config.params.level, 9);
        assert!(config.params.write_content_size);
        assert_eq!(config.write_size, Some(4096));
        assert_eq!(config.source_size, None);
    }

    #[test]
    fn json_roundtrip_preserves_config() {
        let config = StreamConfig::new(
            CompressionParams::with_level(-5).checksum(true).window_log(Some(20)),
            Some(1 << 20),
            Some(8192),
        );
        let json = config.to_json().unwrap();
        assert_eq!(StreamConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn json_errors_are_validation_errors() {
        let err = StreamConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.category(), "validation");

        let err = StreamConfig::from_json(r#"{"write_size":0}"#).unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)));
    }

    #[test]
    fn write_size_bounds() {
        let zero = StreamConfig::new(CompressionParams::default(), None, Some(0));
        let huge = StreamConfig::new(CompressionParams::default(), None, Some(MAX_WRITE_SIZE + 1));
        let max = StreamConfig::new(CompressionParams::default(), None, Some(MAX_WRITE_SIZE));

        assert!(zero.validate().is_err());
        assert!(huge.validate().is_err());
        assert!(max.validate().is_ok());
    }

    #[test]
    fn resolve_write_size_prefers_explicit_value() {
        let explicit = StreamConfig::new(CompressionParams::default(), None, Some(512));
        assert_eq!(explicit.resolve_write_size(131_075), 512);
        assert_eq!(StreamConfig::default().resolve_write_size(131_075), 131_075);
        assert_eq!(StreamConfig::default().resolve_write_size(0), 1);
    }

    // --- Errors ---

    #[test]
    fn error_categories_and_io_mapping() {
        use std::io;

        let alloc = StreamError::Allocation { context: "scratch buffer", requested: 64 };
        assert!(alloc.is_allocation());
        assert_eq!(alloc.category(), "allocation");
        assert_eq!(io::Error::from(alloc).kind(), io::ErrorKind::OutOfMemory);

        let invariant = StreamError::Invariant("stalled".into());
        assert!(!invariant.is_engine());
        assert_eq!(io::Error::from(invariant).kind(), io::ErrorKind::Other);
    }

    // --- Telemetry ---

    #[test]
    fn counters_merge_and_add_assign() {
        let mut a = TelemetryCounters::default();
        a.add_feed(10);
        a.add_chunk(4);

        let mut b = TelemetryCounters::default();
        b.add_feed(5);
        b.add_finish();
        b.add_chunk(6);

        a += b;
        assert_eq!(a.bytes_in, 15);
        assert_eq!(a.bytes_out, 10);
        assert_eq!(a.feed_calls, 2);
        assert_eq!(a.finish_calls, 1);
        assert_eq!(a.chunks_out, 2);
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Feed, Duration::from_micros(5));
        times.add(Stage::Feed, Duration::from_micros(7));
        times.add(Stage::Finish, Duration::from_micros(1));

        assert_eq!(times.get(Stage::Feed), Duration::from_micros(12));
        assert_eq!(times.get(Stage::Open), Duration::ZERO);
        assert!(!times.contains(Stage::Open));
        assert_eq!(times.total(), Duration::from_micros(13));
        assert_eq!(Stage::Deliver.to_string(), "deliver");
    }

    #[test]
    fn snapshot_reflects_adapter_activity() {
        let data = sample_data(5000);
        let mut cobj = IncrementalCompressor::new(StoredEngine::with_block_size(1024), &StreamConfig::default()).unwrap();

        let mut frame = cobj.compress(&data).unwrap().to_vec();
        frame.extend_from_slice(&cobj.flush().unwrap());
        assert_eq!(decode_stored(&frame), data);

        let snap = cobj.telemetry();
        assert_eq!(snap.bytes_in, data.len() as u64);
        assert_eq!(snap.bytes_out, frame.len() as u64);
        assert!(snap.finish_calls >= 1);
        assert!(snap.compression_ratio > 1.0, "stored frames only add overhead");
        for stage in [Stage::Open, Stage::Feed, Stage::Finish, Stage::Deliver] {
            assert!(snap.stage_times.contains(stage), "missing stage {stage}");
        }

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"bytes_in\":5000"));
    }

    #[test]
    fn sink_telemetry_counts_forwarded_bytes() {
        let compressor = StreamCompressor::new(StoredEngine::with_block_size(256), StreamConfig::default());
        let mut sink = compressor.stream_writer(Vec::new());

        sink.enter().unwrap();
        sink.write(&sample_data(1000)).unwrap();
        sink.exit(ScopeExit::Normal).unwrap();

        assert_eq!(sink.counters().bytes_out, sink.get_ref().len() as u64);
        assert_eq!(sink.telemetry().bytes_in, 1000);
    }

    // --- Factory ---

    #[test]
    fn factory_adapters_share_configuration() {
        let config = StreamConfig::new(CompressionParams::default(), None, Some(64));
        let compressor = StreamCompressor::new(StoredEngine::with_block_size(32), config.clone());
        assert_eq!(compressor.config(), &config);

        let sink = compressor.stream_writer(Vec::new());
        assert_eq!(sink.config(), &config);

        let sized = compressor.stream_writer_sized(Vec::new(), Some(10), None);
        assert_eq!(sized.config().source_size, Some(10));
        assert_eq!(sized.config().write_size, Some(64));

        let mut cobj = compressor.compressobj_sized(Some(3)).unwrap();
        cobj.compress(b"abc").unwrap();
        assert!(cobj.flush().is_ok());
    }

    #[test]
    fn factory_one_shot_matches_incremental() {
        let compressor = StreamCompressor::new(StoredEngine::with_block_size(100), StreamConfig::default());
        let data = sample_data(777);

        let one_shot = compressor.compress(&data).unwrap();

        let mut cobj = compressor.compressobj().unwrap();
        let mut incremental = cobj.compress(&data).unwrap().to_vec();
        incremental.extend_from_slice(&cobj.flush().unwrap());

        assert_eq!(one_shot.as_ref(), incremental.as_slice());
    }
}
