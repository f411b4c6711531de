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

use circle_rrtstar::{CircleObstacle, Point2D, RrtStarConfig, Scenario, Tree, Workspace};
use plotly::common::{Fill, Line, Mode};
use plotly::{Layout, Plot, Scatter};
use std::env;
use std::error::Error;
use std::f64::consts::TAU;
use std::path::Path;

/// Four disc world used when no scenario file is given
fn default_scenario() -> Scenario {
    Scenario {
        start: Point2D::new(5.0, 5.0),
        goal: Point2D::new(95.0, 95.0),
        workspace: Workspace::new(0.0, 100.0, 0.0, 100.0),
        obstacles: vec![
            CircleObstacle::new(40.0, 40.0, 10.0),
            CircleObstacle::new(70.0, 70.0, 15.0),
            CircleObstacle::new(60.0, 20.0, 8.0),
            CircleObstacle::new(20.0, 80.0, 7.0),
        ],
        planner: RrtStarConfig {
            step_size: 2.5,
            ..Default::default()
        },
    }
}

// Outline of a disc as a closed polygon
fn circle_outline(obstacle: &CircleObstacle) -> (Vec<f64>, Vec<f64>) {
    (0..=64_u32)
        .map(|i| {
            let theta = TAU * f64::from(i) / 64.0;
            (
                obstacle.center.x + obstacle.radius * theta.cos(),
                obstacle.center.y + obstacle.radius * theta.sin(),
            )
        })
        .unzip()
}

/// Visualize the tree, and the path if one was found
fn visualize(scenario: &Scenario, path: Option<&Vec<Point2D>>, tree: &Tree<Point2D>) {
    let mut plot = Plot::new();

    // Plot obstacles
    for obstacle in &scenario.obstacles {
        let (x, y) = circle_outline(obstacle);
        let trace = Scatter::new(x, y)
            .fill(Fill::ToSelf)
            .fill_color("black")
            .line(Line::new().color("black"))
            .opacity(0.3);
        plot.add_trace(trace);
    }

    // Plot tree
    for (child, parent) in tree.edges() {
        let trace = Scatter::new(vec![child.x, parent.x], vec![child.y, parent.y])
            .mode(Mode::Lines)
            .line(Line::new().color("lightgray"));
        plot.add_trace(trace);
    }

    // Plot path
    if let Some(path) = path {
        let path_x: Vec<_> = path.iter().map(|p| p.x).collect();
        let path_y: Vec<_> = path.iter().map(|p| p.y).collect();
        let path_trace = Scatter::new(path_x, path_y)
            .mode(Mode::Lines)
            .line(Line::new().color("red").width(4.0));
        plot.add_trace(path_trace);
    }

    // Plot start and end
    let start_trace = Scatter::new(vec![scenario.start.x], vec![scenario.start.y])
        .mode(Mode::Markers)
        .marker(plotly::common::Marker::new().color("green").size(16));
    let end_trace = Scatter::new(vec![scenario.goal.x], vec![scenario.goal.y])
        .mode(Mode::Markers)
        .marker(plotly::common::Marker::new().color("yellow").size(16));
    plot.add_trace(start_trace);
    plot.add_trace(end_trace);

    let title = if path.is_some() {
        "RRT* - path found"
    } else {
        "RRT* - no path found"
    };
    let layout = Layout::new()
        .title(title.into())
        .show_legend(false)
        .width(750)
        .height(750)
        .x_axis(plotly::layout::Axis::new().title("X".into()))
        .y_axis(plotly::layout::Axis::new().title("Y".into()));

    plot.set_layout(layout);
    plot.show();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let scenario = match args.get(1) {
        Some(path) => Scenario::load(Path::new(path))?,
        None => default_scenario(),
    };

    println!("Start pose: {}", scenario.start);
    println!("End pose: {}", scenario.goal);

    let result = scenario.plan()?;
    match &result.path {
        Some(path) => println!(
            "Path found with {} points after {} iterations",
            path.len(),
            result.iterations
        ),
        None => println!("RRT* failed: {:?}", result.termination),
    }
    visualize(&scenario, result.path.as_ref(), &result.tree);
    Ok(())
}
