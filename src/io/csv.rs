use std::io::{self, Write};

use crate::dynamics::state::{State, TranslationCommand};

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          quat_w, quat_x, quat_y, quat_z, rcs_enabled, speed_error,
///          cmd_x, cmd_y, cmd_z
///
/// `commands[i]` is the command that produced `trajectory[i]`; missing
/// entries are written as zero.
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    trajectory: &[State],
    commands: &[TranslationCommand],
) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         quat_w,quat_x,quat_y,quat_z,rcs_enabled,speed_error,\
         cmd_x,cmd_y,cmd_z"
    )?;

    for (i, s) in trajectory.iter().enumerate() {
        let q = s.quat.quaternion();
        let c = commands.get(i).copied().unwrap_or_default();
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.5},{:.5},{:.5},\
             {:.6},{:.6},{:.6},{:.6},{},{:.5},\
             {:.4},{:.4},{:.4}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            q.w, q.i, q.j, q.k,
            u8::from(s.rcs_enabled),
            s.speed_error,
            c.x, c.y, c.z,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(
    path: &str,
    trajectory: &[State],
    commands: &[TranslationCommand],
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory, commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn csv_output_has_header_and_rows() {
        let state = |time: f64, vx: f64, on: bool| State {
            time,
            pos: Vector3::zeros(),
            vel: Vector3::new(vx, 0.0, 0.0),
            accel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            rcs_enabled: on,
            speed_error: vx.abs(),
        };
        let traj = vec![state(0.0, 0.5, false), state(0.02, 0.48, true)];
        let cmds = vec![TranslationCommand::ZERO, TranslationCommand { x: 1.0, y: 0.0, z: -0.5 }];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj, &cmds).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines[2].ends_with(",1,0.48000,1.0000,0.0000,-0.5000"));
    }
}
