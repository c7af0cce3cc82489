use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use monitor_codec::{decode_monitors, encode_monitors, EncodeOptions, MonitorList};

fn make_list_response(copies: usize) -> Vec<u8> {
    let kinds = [
        r#"{"id":"2cSZzK3XfmA","type":"connectivity","scopes":[],"excludeScopes":[]}"#,
        r#"{"id":"2cSZzK3XfmB","type":"host","name":"disk.aa-00.writes.delta","duration":3,"metric":"disk.aa-00.writes.delta","operator":">","warning":20000.0,"critical":400000.0,"maxCheckAttempts":3,"scopes":["Hatena-Blog"]}"#,
        r#"{"id":"2cSZzK3XfmC","type":"service","service":"Hatena-Blog","metric":"access_num.4xx_count","operator":">","warning":50.0,"critical":100.0,"duration":1,"maxCheckAttempts":5,"notificationInterval":60}"#,
        r#"{"id":"2cSZzK3XfmD","type":"external","method":"POST","url":"https://example.com","headers":[{"name":"Cache-Control","value":"no-cache"}],"responseTimeCritical":3000,"responseTimeDuration":7,"certificationExpirationCritical":60}"#,
        r#"{"id":"2cSZzK3XfmE","type":"expression","expression":"avg(roleSlots(\"server:role\",\"loadavg5\"))","operator":">","warning":5.0,"critical":10.0}"#,
    ];
    let entries: Vec<&str> = kinds.iter().copied().cycle().take(copies * kinds.len()).collect();
    format!("{{\"monitors\":[{}]}}", entries.join(",")).into_bytes()
}

fn bench_decode_list(c: &mut Criterion) {
    let raw = make_list_response(40);
    let mut group = c.benchmark_group("monitors");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("decode_list", |b| {
        b.iter(|| decode_monitors(black_box(&raw)).unwrap());
    });

    group.bench_function("split_list", |b| {
        b.iter(|| MonitorList::from_slice(black_box(&raw)).unwrap());
    });

    let monitors = decode_monitors(&raw).unwrap();
    group.bench_function("encode_list", |b| {
        b.iter(|| encode_monitors(black_box(&monitors), &EncodeOptions::default()).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_decode_list);
criterion_main!(benches);
