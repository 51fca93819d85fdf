// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use psrx_core::core::cpu::CPU;
use psrx_core::core::gpu::GPU;
use psrx_core::core::memory::Bus;
use psrx_core::core::{InputSnapshot, Region, System};
use std::hint::black_box;

/// `addiu r1, r1, 1` repeated, ending in a jump back to the start
fn alu_loop(bus: &mut Bus, base: u32, len: u32) {
    for i in 0..len {
        bus.write32(base + i * 4, 0x2421_0001).unwrap();
    }
    bus.write32(base + len * 4, 0x0800_0000 | ((base >> 2) & 0x03FF_FFFF))
        .unwrap();
    bus.write32(base + len * 4 + 4, 0).unwrap();
}

fn cpu_step_benchmark(c: &mut Criterion) {
    c.bench_function("cpu_step", |b| {
        let mut cpu = CPU::new();
        let mut bus = Bus::new();
        alu_loop(&mut bus, 0x8000_1000, 64);
        cpu.set_pc(0x8000_1000);

        b.iter(|| black_box(cpu.step(&mut bus)));
    });
}

fn cpu_register_access_benchmark(c: &mut Criterion) {
    c.bench_function("cpu_register_read", |b| {
        let cpu = CPU::new();
        b.iter(|| {
            for i in 0..32 {
                black_box(cpu.reg(i));
            }
        });
    });
}

fn gpu_triangle_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("gpu_triangle");

    for size in [16u32, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut gpu = GPU::new();
            gpu.write_gp0(0xE300_0000);
            gpu.write_gp0(0xE407_FFFF);

            b.iter(|| {
                // Gouraud triangle
                gpu.write_gp0(0x3000_00FF);
                gpu.write_gp0(0);
                gpu.write_gp0(0x0000_FF00);
                gpu.write_gp0(size);
                gpu.write_gp0(0x00FF_0000);
                gpu.write_gp0(size << 16);
                black_box(gpu.read_vram(1, 1));
            });
        });
    }

    group.finish();
}

fn full_frame_benchmark(c: &mut Criterion) {
    c.bench_function("run_frame", |b| {
        let mut bios = vec![0u8; Bus::BIOS_SIZE];
        // addiu loop at the reset vector
        for i in 0..64 {
            bios[i * 4..i * 4 + 4].copy_from_slice(&0x2421_0001u32.to_le_bytes());
        }
        bios[256..260].copy_from_slice(&0x0BF0_0000u32.to_le_bytes());

        let mut system = System::new();
        system.init(&bios, Region::Ntsc).unwrap();
        let input = InputSnapshot::default();

        b.iter(|| black_box(system.run_frame(&input).unwrap()));
    });
}

criterion_group!(
    benches,
    cpu_step_benchmark,
    cpu_register_access_benchmark,
    gpu_triangle_benchmark,
    full_frame_benchmark
);
criterion_main!(benches);
