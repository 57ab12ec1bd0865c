//! Integration tests for native type mapping and the describe layer.

use std::io;
use std::sync::{Arc, Mutex};

use odbc_wire_rs::types::{FieldMetadata, MAX_VARCHAR_SIZE};
use odbc_wire_rs::{
    describe_column, type_info, CType, ConnectionSettings, ErrorCode, ErrorSink, Int8As,
    NativeType, OdbcVersion, ResultMetadata, SqlType, TypeMapper, UnknownSizePolicy,
};
use rand::Rng;

#[derive(Default)]
struct CollectingSink {
    reports: Mutex<Vec<(ErrorCode, String)>>,
}

impl ErrorSink for CollectingSink {
    fn report(&self, code: ErrorCode, message: &str) {
        self.reports.lock().unwrap().push((code, message.to_string()));
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_unknown_oids_degrade_to_character_data() {
    let narrow = ConnectionSettings::new();
    let wide = ConnectionSettings::new().with_wide_chars(true);
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let oid = rng.gen_range(1..=i32::MAX);
        let native = NativeType::from_oid(oid);
        if !matches!(native, NativeType::Other(_)) {
            continue;
        }

        let mapper = TypeMapper::new(&narrow);
        assert_eq!(mapper.concise_type(native, None), SqlType::VarChar, "oid {}", oid);
        assert_eq!(mapper.c_type(native), CType::Char, "oid {}", oid);
        assert_eq!(
            mapper
                .column_size(native, None, UnknownSizePolicy::Max)
                .unwrap(),
            MAX_VARCHAR_SIZE
        );

        let mapper = TypeMapper::new(&wide);
        assert_eq!(mapper.concise_type(native, None), SqlType::VarChar, "oid {}", oid);
        assert_eq!(mapper.c_type(native), CType::WChar, "oid {}", oid);
    }
}

#[test]
fn test_every_known_type_has_facets() {
    let settings = ConnectionSettings::new();
    let mapper = TypeMapper::new(&settings);
    for native in NativeType::KNOWN {
        let facets = mapper.facets(native, None, UnknownSizePolicy::Max);
        if native == NativeType::Name {
            assert!(facets.is_err());
            continue;
        }
        let facets = facets.unwrap();
        assert_eq!(facets.concise_type, mapper.concise_type(native, None));
        assert!(!facets.type_name.is_empty(), "{:?} has no type name", native);
    }
}

#[test]
fn test_name_size_reported_to_sink_and_log() {
    let settings = ConnectionSettings::new();
    let sink = CollectingSink::default();
    let mapper = TypeMapper::new(&settings).with_error_sink(&sink);

    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let err = tracing::subscriber::with_default(subscriber, || {
        describe_column(&mapper, "relname", NativeType::Name, None, UnknownSizePolicy::Max)
            .unwrap_err()
    });
    assert_eq!(err.code(), ErrorCode::Internal);

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, ErrorCode::Internal);

    let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert!(logged.contains("WARN"), "log was: {}", logged);
    assert!(
        logged.contains("column size not implemented for name"),
        "log was: {}",
        logged
    );
}

#[test]
fn test_describe_uses_result_metadata() {
    let settings = ConnectionSettings::new();
    let result = ResultMetadata::live(vec![
        FieldMetadata::new("code").with_type_modifier(12),
        FieldMetadata::new("body").with_type_modifier(2000),
    ]);
    let mapper = TypeMapper::new(&settings).with_result(&result);

    let code = describe_column(&mapper, "code", NativeType::Bpchar, Some(0), UnknownSizePolicy::Max)
        .unwrap();
    assert_eq!(code.concise_type, SqlType::Char);
    assert_eq!(code.column_size, 12);

    let body = describe_column(&mapper, "body", NativeType::Varchar, Some(1), UnknownSizePolicy::Max)
        .unwrap();
    assert_eq!(body.concise_type, SqlType::LongVarChar);
    assert_eq!(body.column_size, 2000);
}

#[test]
fn test_type_info_lists_wide_types_only_when_enabled() {
    let narrow = ConnectionSettings::new();
    let rows = type_info(&TypeMapper::new(&narrow)).unwrap();
    assert!(rows.iter().all(|r| r.data_type != SqlType::WChar));

    let wide = ConnectionSettings::new().with_wide_chars(true);
    let rows = type_info(&TypeMapper::new(&wide)).unwrap();
    for sql in [SqlType::WChar, SqlType::WVarChar, SqlType::WLongVarChar] {
        assert!(rows.iter().any(|r| r.data_type == sql), "{:?} missing", sql);
    }
}

#[test]
fn test_settings_from_connection_string() {
    let settings =
        ConnectionSettings::parse("WideChars=1; int8as=varchar;ODBCVersion=2;;LFConversion=yes")
            .unwrap();
    assert!(settings.wide_chars);
    assert_eq!(settings.int8_as, Int8As::VarChar);
    assert_eq!(settings.odbc_version, OdbcVersion::V2);
    assert!(settings.lf_conversion);

    let mapper = TypeMapper::new(&settings);
    assert_eq!(mapper.concise_type(NativeType::Int8, None), SqlType::VarChar);
    assert_eq!(mapper.concise_type(NativeType::Date, None), SqlType::Date);

    let err = ConnectionSettings::parse("Colour=blue").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(ConnectionSettings::parse("MaxBytesPerChar=0").is_err());
    assert_eq!(ConnectionSettings::parse("").unwrap(), ConnectionSettings::new());
}
