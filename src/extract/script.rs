use std::path::Path;

use super::ExtractConfig;
use crate::io::ChunkLayout;

/// Braces a path for Tcl so whitespace and `$` are taken literally.
fn tcl_literal(path: &Path) -> String {
    format!("{{{}}}", path.display())
}

/// Atom selection covering molecules `0..num_mols`.
pub fn selection(num_mols: usize) -> String {
    format!("residue 0 to {}", num_mols.saturating_sub(1))
}

/// Renders the VMD script that dumps every frame of chunk `chunk` as one line
/// of ` x y z ` triplets.
pub fn render(layout: &ChunkLayout, chunk: usize, config: &ExtractConfig) -> String {
    let traj = layout.trajectory_dir(chunk);
    let psf = traj.join(format!("{}.psf", config.psf));
    let dcd = traj.join(format!("{}.dcd", config.dcd));
    let out = layout.wrapped_file(chunk);

    format!(
        r#"# frame extraction for chunk {chunk}
puts "chunk {chunk}: started [clock format [clock seconds]]"

set psf {psf}
set dcd {dcd}
set out [open {out} w]

set mol [mol load psf $psf dcd $dcd]
set nf [molinfo $mol get numframes]
puts "frames: $nf"
set sel [atomselect $mol "{selection}"]

for {{set frame 0}} {{$frame < $nf}} {{incr frame}} {{
    $sel frame $frame
    set line ""
    foreach xyz [$sel get {{x y z}}] {{
        append line [format " %.6f %.6f %.6f " [lindex $xyz 0] [lindex $xyz 1] [lindex $xyz 2]]
    }}
    puts $out $line
}}

close $out
$sel delete
mol delete all
exit
"#,
        chunk = chunk,
        psf = tcl_literal(&psf),
        dcd = tcl_literal(&dcd),
        out = tcl_literal(&out),
        selection = selection(config.num_mols),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> ExtractConfig {
        ExtractConfig {
            vmd: PathBuf::from("vmd"),
            psf: "system".into(),
            dcd: "traj".into(),
            num_mols: 500,
            expected_atoms: None,
            threads: 8,
        }
    }

    #[test]
    fn selection_is_zero_based_and_inclusive() {
        assert_eq!(selection(500), "residue 0 to 499");
        assert_eq!(selection(1), "residue 0 to 0");
    }

    #[test]
    fn script_points_at_chunk_inputs_and_output() {
        let layout = ChunkLayout::new("/sim", "trajectories", "nvt");
        let script = render(&layout, 3, &config());

        assert!(script.contains("set psf {/sim/trajectories/3to4ns/system.psf}"));
        assert!(script.contains("set dcd {/sim/trajectories/3to4ns/traj.dcd}"));
        assert!(script.contains("set out [open {/sim/nvt/data/xyz_3.dat} w]"));
        assert!(script.contains("atomselect $mol \"residue 0 to 499\""));
        assert!(script.contains("format \" %.6f %.6f %.6f \""));
        assert!(script.trim_end().ends_with("exit"));
    }

    #[test]
    fn braces_in_loops_are_balanced() {
        let layout = ChunkLayout::new("/sim", "in", "out");
        let script = render(&layout, 0, &config());
        let open = script.matches('{').count();
        let close = script.matches('}').count();
        assert_eq!(open, close);
    }
}
