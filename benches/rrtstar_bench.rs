// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use circle_rrtstar::{plan, CircleObstacle, Point2D, RrtStarConfig, Workspace};
use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};

fn run_rrtstar(rewire: bool, seed: u64) {
    let start = Point2D::new(5.0, 5.0);
    let goal = Point2D::new(95.0, 95.0);
    let workspace = Workspace::new(0.0, 100.0, 0.0, 100.0);
    let obstacles = [
        CircleObstacle::new(40.0, 40.0, 10.0),
        CircleObstacle::new(70.0, 70.0, 15.0),
        CircleObstacle::new(60.0, 20.0, 8.0),
        CircleObstacle::new(20.0, 80.0, 7.0),
    ];
    let config = RrtStarConfig {
        step_size: 2.5,
        rewire,
        seed,
        ..Default::default()
    };

    let result = plan(&start, &goal, &workspace, &obstacles, &config);
    assert!(result.is_ok(), "Expected Ok result, got Err");
}

fn bench_rrt(c: &mut Criterion) {
    c.bench_function("rrt", |b| b.iter(|| run_rrtstar(false, 1)));
}

fn bench_rrtstar(c: &mut Criterion) {
    c.bench_function("rrtstar", |b| b.iter(|| run_rrtstar(true, 1)));
}

criterion_group!(benches, bench_rrt, bench_rrtstar);
criterion_main!(benches);
