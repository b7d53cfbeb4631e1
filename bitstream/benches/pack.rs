use bitstream::{BitReader, BitWriter};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const FIELDS: usize = 1024;

fn write_fields(writer: &mut BitWriter) {
    for i in 0..FIELDS {
        writer.write_bool(i % 3 == 0);
        writer.write(11, (i as u16) & 0x7FF).unwrap();
        writer.write_signed(9, (i as i32 % 511) - 255).unwrap();
    }
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitstream");
    group.throughput(Throughput::Elements(FIELDS as u64 * 3));
    group.bench_function("write_mixed_widths", |b| {
        b.iter(|| {
            let mut writer = BitWriter::with_capacity(FIELDS * 3);
            write_fields(&mut writer);
            black_box(writer.finish())
        });
    });

    let mut writer = BitWriter::new();
    write_fields(&mut writer);
    let bytes = writer.finish();

    group.bench_function("read_mixed_widths", |b| {
        b.iter(|| {
            let mut reader = BitReader::new(black_box(&bytes)).unwrap();
            let mut sum = 0i64;
            for _ in 0..FIELDS {
                sum += i64::from(reader.read_bool().unwrap());
                sum += i64::from(reader.read::<u16>(11).unwrap());
                sum += i64::from(reader.read_signed::<i32>(9).unwrap());
            }
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_write);
criterion_main!(benches);
