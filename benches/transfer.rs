//! Throughput of fixed-width transfers for a few widths and all the
//! combinations of byte and bit order, on unaligned data.

use bitfield_stream::engine::mask;
use bitfield_stream::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;
use std::time::Duration;

const N: usize = 100_000;
const WIDTHS: [usize; 5] = [1, 7, 13, 32, 64];
const ORDERS: [(ByteOrder, BitOrder); 4] = [(BE, MSB), (BE, LSB), (LE, MSB), (LE, LSB)];

fn gen_data(n_bits: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(0);
    (0..N)
        .map(|_| rng.random_range(0..=mask(n_bits)))
        .collect::<Vec<_>>()
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_bits");
    for n_bits in WIDTHS {
        let data = gen_data(n_bits);
        group.throughput(Throughput::Elements(N as u64));
        for (byte_order, bit_order) in ORDERS {
            let id = BenchmarkId::new(format!("{byte_order}/{bit_order}"), n_bits);
            group.bench_with_input(id, &data, |b, data| {
                let mut buffer = Vec::with_capacity(N * 8 + 1);
                b.iter(|| {
                    buffer.clear();
                    let mut writer = BitWriter::with_orders(
                        MemByteWriterVec::new(&mut buffer),
                        byte_order,
                        bit_order,
                    );
                    writer.write_bits(0, 3).unwrap();
                    for &value in data {
                        writer.write_bits(black_box(value), n_bits).unwrap();
                    }
                })
            });
        }
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_bits");
    for n_bits in WIDTHS {
        let data = gen_data(n_bits);
        group.throughput(Throughput::Elements(N as u64));
        for (byte_order, bit_order) in ORDERS {
            let mut writer =
                BitWriter::with_orders(MemByteWriterVec::new(Vec::new()), byte_order, bit_order);
            writer.write_bits(0, 3).unwrap();
            for &value in &data {
                writer.write_bits(value, n_bits).unwrap();
            }
            let bytes = writer.into_inner().into_inner();

            let id = BenchmarkId::new(format!("{byte_order}/{bit_order}"), n_bits);
            group.bench_with_input(id, &bytes, |b, bytes| {
                b.iter(|| {
                    let mut reader =
                        BitReader::with_orders(MemByteReader::new(bytes), byte_order, bit_order);
                    reader.skip_bits(3).unwrap();
                    for _ in 0..N {
                        black_box(reader.read_bits(n_bits).unwrap());
                    }
                })
            });
        }
    }
    group.finish();
}

criterion_group! {
    name = transfer_benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = bench_write, bench_read
}
criterion_main!(transfer_benches);
