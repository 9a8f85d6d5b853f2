use ::rand::rngs::StdRng;
use ::rand::SeedableRng;
use macroquad::prelude::*;

use rigid2d::dynamics::{Body, BodyDef, BodyOptions, Shape};
use rigid2d::math::{random_range, random_unit, Vec2};

#[derive(Copy, Clone, Debug)]
enum Demo {
    Demo1,
    Demo2,
}

impl Demo {
    fn name(self) -> &'static str {
        match self {
            Demo::Demo1 => "Demo 1: Pinned Box",
            Demo::Demo2 => "Demo 2: Falling Bodies",
        }
    }

    fn from_key(key: KeyCode) -> Option<Demo> {
        Some(match key {
            KeyCode::Key1 => Demo::Demo1,
            KeyCode::Key2 => Demo::Demo2,
            _ => return None,
        })
    }
}

const GRAVITY: Vec2 = Vec2::new(0.0, 350.0);
const ANCHOR: Vec2 = Vec2::new(295.0, 75.0);

fn pinned_box_scene() -> Vec<Body> {
    let def = BodyDef {
        options: BodyOptions {
            pin: Some(ANCHOR),
            ..Default::default()
        },
        ..BodyDef::new(
            Vec2::new(300.0, 75.0),
            Shape::Box { size: Vec2::new(60.0, 20.0) },
        )
    };
    vec![Body::from_def(def).expect("valid demo body")]
}

fn falling_bodies_scene(rng: &mut StdRng) -> Vec<Body> {
    let mut bodies = Vec::new();
    for i in 0..12 {
        let x = 60.0 + i as f32 * 60.0;
        let y = random_range(rng, 40.0, 160.0);
        let def = if i % 3 == 0 {
            BodyDef::new(
                Vec2::new(x, y),
                Shape::Circle {
                    radius: random_range(rng, 8.0, 18.0),
                },
            )
        } else {
            BodyDef {
                options: BodyOptions {
                    angle: Some(random_unit(rng)),
                    angular_velocity: Some(random_unit(rng) * 2.0),
                    ..Default::default()
                },
                ..BodyDef::new(
                    Vec2::new(x, y),
                    Shape::Box {
                        size: Vec2::new(random_range(rng, 16.0, 40.0), random_range(rng, 16.0, 40.0)),
                    },
                )
            }
        };
        bodies.push(Body::from_def(def).expect("valid demo body"));
    }
    bodies
}

fn load(demo: Demo, rng: &mut StdRng) -> Vec<Body> {
    match demo {
        Demo::Demo1 => pinned_box_scene(),
        Demo::Demo2 => falling_bodies_scene(rng),
    }
}

fn draw_body(body: &mut Body) {
    match body.shape {
        Shape::Box { .. } => {
            let pts = body.transformed_points().to_vec();
            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                draw_line(a.x, a.y, b.x, b.y, 1.5, SKYBLUE);
            }
        }
        Shape::Circle { radius } => {
            draw_circle_lines(body.position.x, body.position.y, radius, 1.5, SKYBLUE);
        }
    }

    let aabb = body.aabb();
    draw_rectangle_lines(
        aabb.min.x,
        aabb.min.y,
        aabb.max.x - aabb.min.x,
        aabb.max.y - aabb.min.y,
        1.0,
        DARKGRAY,
    );

    if let Some(pin) = body.pin {
        draw_circle(pin.x, pin.y, 3.0, RED);
    }
}

#[macroquad::main("rigid2d samples")]
async fn main() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut demo = Demo::Demo1;
    let mut bodies = load(demo, &mut rng);

    loop {
        if let Some(key) = get_last_key_pressed() {
            if let Some(d) = Demo::from_key(key) {
                demo = d;
                bodies = load(demo, &mut rng);
            } else if key == KeyCode::R {
                bodies = load(demo, &mut rng);
            }
        }

        let dt = get_frame_time().min(1.0 / 30.0);
        for body in &mut bodies {
            body.apply_force(GRAVITY);
            body.update(dt);

            // Wrap fallen bodies back to the top.
            if body.position.y > screen_height() + 60.0 {
                body.move_to(Vec2::new(body.position.x, -40.0));
                body.linear_velocity = Vec2::ZERO;
            }
        }

        clear_background(BLACK);
        for body in &mut bodies {
            draw_body(body);
        }
        draw_text(demo.name(), 16.0, 24.0, 24.0, WHITE);
        draw_text("1-2 select demo, R reset", 16.0, 44.0, 18.0, GRAY);

        next_frame().await;
    }
}
