use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Build a TNEF stream with `count` attachments of `size` bytes each and a
/// message property block carrying a plain-text body.
fn synthetic_tnef(count: usize, size: usize) -> Vec<u8> {
    fn record(buf: &mut Vec<u8>, level: u8, tag: u16, payload: &[u8]) {
        buf.push(level);
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&0x0006u16.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&[0, 0]);
    }

    let mut buf = vec![0x78, 0x9F, 0x3E, 0x22, 0x01, 0x00];

    let body = b"Lorem ipsum dolor sit amet\0";
    let mut props = 1u32.to_le_bytes().to_vec();
    props.extend_from_slice(&0x001Eu16.to_le_bytes());
    props.extend_from_slice(&0x1000u16.to_le_bytes());
    props.extend_from_slice(&1u32.to_le_bytes());
    props.extend_from_slice(&(body.len() as u32).to_le_bytes());
    props.extend_from_slice(body);
    props.resize(props.len() + (body.len().wrapping_neg() & 3), 0);
    record(&mut buf, 0x01, 0x9003, &props);

    let data = vec![0xA5u8; size];
    for i in 0..count {
        record(&mut buf, 0x02, 0x9002, &[]);
        record(&mut buf, 0x02, 0x8010, format!("file_{i}.bin\0").as_bytes());
        record(&mut buf, 0x02, 0x800F, &data);
    }
    buf
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (count, size) in [(1, 1024), (16, 64 * 1024), (256, 512)] {
        let buf = synthetic_tnef(count, size);
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{count}x{size}")),
            &buf,
            |b, buf| b.iter(|| tnefextract::decode(buf).unwrap()),
        );
    }
    group.finish();
}

fn bench_properties(c: &mut Criterion) {
    // 512 single-valued Int properties.
    let mut payload = 512u32.to_le_bytes().to_vec();
    for id in 0..512u16 {
        payload.extend_from_slice(&0x0003u16.to_le_bytes());
        payload.extend_from_slice(&id.to_le_bytes());
        payload.extend_from_slice(&u32::from(id).to_le_bytes());
    }

    c.bench_function("decode_properties_512_int", |b| {
        b.iter(|| tnefextract::parser::mapi::decode_properties(&payload).unwrap())
    });
}

criterion_group!(benches, bench_decode, bench_properties);
criterion_main!(benches);
