#![no_main]

use std::sync::Arc;

use colchain::{
    ColumnFamilyOptions, Connection, ConnectionOptions, InMemoryStore, KeyspaceOptions,
    PropertyDescriptor, RangeDescriptor, Slice, Value, WriteValue,
};
use libfuzzer_sys::fuzz_target;

// Fuzz target for address chains.
// Drives arbitrary write/read/delete/exists sequences through both a standard
// and a super family. Validation failures are fine; panics and reads that
// disagree with their collapsed form are not.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let store = Arc::new(InMemoryStore::new());
    let conn = Arc::new(Connection::with_options(
        store,
        ConnectionOptions {
            parallel_reads: data[0] & 1 == 1,
            ..Default::default()
        },
    ));
    let keyspace = conn.keyspace("fuzz");
    if keyspace.materialize(&KeyspaceOptions::default()).is_err() {
        return;
    }
    let standard = keyspace.column_family("standard");
    let sup = keyspace.column_family("super");
    if standard
        .materialize(&ColumnFamilyOptions::standard("BytesType"))
        .is_err()
        || sup
            .materialize(&ColumnFamilyOptions::super_family("BytesType", "BytesType"))
            .is_err()
    {
        return;
    }

    let mut i = 1;
    let mut ts = 0i64;
    while i + 3 <= data.len() {
        let op = data[i] % 6;
        let key = [b'k', data[i + 1] % 4];
        let name = [b'n', data[i + 2] % 4];
        i += 3;
        ts += 1;

        let cf = if op % 2 == 0 { &standard } else { &sup };
        match op {
            0 => {
                let _ = cf.key(&key).property(&name).write_at(data[i.min(data.len())..].to_vec(), ts);
            },
            1 => {
                let value = WriteValue::columns([(&name, &key)]);
                let _ = cf.key(&key).property(&name).write_at(value, ts);
            },
            2 => {
                let single = cf.key(&key).property(&name).read();
                let row = cf.key(&key).properties([Slice::from(&name)]).read();
                if let (Ok(single), Ok(Some(row))) = (single, row) {
                    assert_eq!(single.as_ref(), row.get(&name[..]));
                }
            },
            3 => {
                let _ = cf.key(&key).property(&name).property(&key).write_at("s", ts);
            },
            4 => {
                let descriptors = vec![
                    PropertyDescriptor::Name(Slice::from(&name)),
                    RangeDescriptor::new().start(&key[..]).limit(3).into(),
                ];
                if let Ok(Some(Value::Map(row))) = cf.key(&key).properties(descriptors).read() {
                    assert!(row.len() <= 4);
                }
            },
            _ => {
                let _ = cf.keys([&key[..], &name[..]]).exists();
                let _ = cf.key(&key).property(&name).delete_at(ts);
            },
        }
    }
});
