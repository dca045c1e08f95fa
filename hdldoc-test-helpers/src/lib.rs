// SPDX-License-Identifier: Apache-2.0

//! Sample Verilog designs shared by the core and driver tests.

use std::path::{Path, PathBuf};

/// One file of a sample design; `name` is relative to the design root.
#[derive(Debug, Clone, Copy)]
pub struct DesignFile {
    pub name: &'static str,
    pub text: &'static str,
}

const CPU_TOP_V: &str = r#"// Top of the sample CPU.
module cpu_top #(
  parameter integer XLEN = 32, NREGS = 16
) (
  input  wire clk,
  input  wire rst_n,
`ifdef DEBUG
  output wire [XLEN-1:0] dbg_pc,
`endif
  output reg  [7:0] status
);
  localparam HALF = XLEN / 2;

  alu #(.W(XLEN)) u_alu0 (.clk(clk), .a(a0), .b(b0));
  alu #(.W(XLEN)) u_alu1 (.clk(clk), .a(a1), .b(b1));
  regfile u_rf (.clk(clk));
  /* the PLL model lives in a vendor library */
  vendor_pll u_pll (.clk_in(clk));

  always @(posedge clk) begin
    status <= 8'h0;
  end
endmodule
"#;

const ALU_V: &str = r#"module alu #(parameter W = 8) (
  input clk,
  input [W-1:0] a, b,
  output [W-1:0] y
);
  adder #(.W(W)) u_add (.a(a), .b(b), .s(y));
endmodule

module adder #(parameter W = 8) (input [W-1:0] a, b, output [W-1:0] s);
  assign s = a + b;
endmodule
"#;

const REGFILE_V: &str = r#"module regfile(clk, we, waddr);
  input clk;
  input we;
  input [3:0] waddr;
  parameter DEPTH = 16;
  reg [31:0] mem [0:DEPTH-1];
endmodule
"#;

/// Three files, five modules. `cpu_top` instantiates `alu` twice, `regfile`
/// once and an undefined `vendor_pll`; `alu` instantiates `adder`.
pub const CPU_DESIGN: &[DesignFile] = &[
    DesignFile {
        name: "rtl/cpu_top.v",
        text: CPU_TOP_V,
    },
    DesignFile {
        name: "rtl/alu.v",
        text: ALU_V,
    },
    DesignFile {
        name: "rtl/regfile.v",
        text: REGFILE_V,
    },
];

/// `ring_a` and `ring_b` instantiate each other.
pub const CYCLIC_DESIGN: &[DesignFile] = &[DesignFile {
    name: "ring.v",
    text: "module ring_a(input x);\n  ring_b u_b (.x(x));\nendmodule\n\nmodule ring_b(input x);\n  ring_a u_a (.x(x));\nendmodule\n",
}];

/// Writes `design` under `root`, creating subdirectories as needed, and
/// returns the written paths in design order.
pub fn write_design(root: &Path, design: &[DesignFile]) -> Vec<PathBuf> {
    design
        .iter()
        .map(|file| {
            let path = root.join(file.name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create design directory");
            }
            std::fs::write(&path, file.text).expect("write design file");
            log::info!("write_design; wrote {}", path.display());
            path
        })
        .collect()
}

/// Writes `design` into a fresh temporary directory.
pub fn write_design_to_tempdir(design: &[DesignFile]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let paths = write_design(dir.path(), design);
    (dir, paths)
}
