//! Criterion benchmarks for the clarivoz enhancement units
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use clarivoz_core::{AudioBlock, BlockProcessor, Chain};
use clarivoz_effects::{DownwardExpander, NoiseGate, PitchShifter};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn test_block(frames: usize) -> AudioBlock {
    let mut block = AudioBlock::new(2, frames);
    for channel in block.channels_mut() {
        for (i, sample) in channel.iter_mut().enumerate() {
            let t = i as f32 / SAMPLE_RATE;
            *sample = (std::f32::consts::TAU * 440.0 * t).sin() * 0.5;
        }
    }
    block
}

fn bench_unit<P: BlockProcessor>(c: &mut Criterion, name: &str, mut unit: P) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = test_block(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut output = AudioBlock::new(2, block_size);
                b.iter(|| {
                    unit.process(black_box(&input), &mut output);
                    black_box(output.channel(0).unwrap()[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_gate(c: &mut Criterion) {
    let mut gate = NoiseGate::new(SAMPLE_RATE);
    gate.set_threshold_db(-50.0);
    gate.set_hold_ms(120.0);
    bench_unit(c, "NoiseGate", gate);
}

fn bench_expander(c: &mut Criterion) {
    let mut expander = DownwardExpander::new(SAMPLE_RATE);
    expander.set_threshold_db(-50.0);
    expander.set_ratio(2.0);
    bench_unit(c, "DownwardExpander", expander);
}

fn bench_pitch_shifter(c: &mut Criterion) {
    let mut shifter = PitchShifter::with_defaults(SAMPLE_RATE).unwrap();
    shifter.set_target_ratio(1.5);
    bench_unit(c, "PitchShifter", shifter);
}

fn bench_full_chain(c: &mut Criterion) {
    let gate = NoiseGate::new(SAMPLE_RATE);
    let mut shifter = PitchShifter::with_defaults(SAMPLE_RATE).unwrap();
    shifter.set_target_ratio(1.5);
    let chain = Chain::new(gate, shifter, 2, 1024);
    bench_unit(c, "Chain", chain);
}

criterion_group!(
    benches,
    bench_gate,
    bench_expander,
    bench_pitch_shifter,
    bench_full_chain
);
criterion_main!(benches);
