//! Module scaffolding
//!
//! The header, state machine and close fragments are fixed templates; the
//! only data they take is the module name.

use crate::fragment::{Fragment, FragmentKind};
use crate::options::EmitterConfig;

const PORTS: &str = "    input               rst,
    input               clk,
    // incoming BAR writes:
    input [31:0]        wr_addr,
    input [3:0]         wr_be,
    input [31:0]        wr_data,
    input               wr_valid,
    // incoming BAR reads:
    input  [87:0]       rd_req_ctx,
    input  [31:0]       rd_req_addr,
    input               rd_req_valid,
    input  [31:0]       base_address_register,
    // outgoing BAR read replies:
    output logic [87:0] rd_rsp_ctx,
    output logic [31:0] rd_rsp_data,
    output logic        rd_rsp_valid
);
";

const DECODE: &str = "
    bit [87:0]      drd_req_ctx;
    bit [31:0]      drd_req_addr;
    bit             drd_req_valid;

    bit [31:0]      dwr_addr;
    bit [31:0]      dwr_data;
    bit             dwr_valid;
    bit [31:0]      wr_data_out;

    wire [19:0]     local_read_addr;
    wire [19:0]     local_write_addr;

    assign local_read_addr = ({drd_req_addr[31:24], drd_req_addr[23:16],
                               drd_req_addr[15:8], drd_req_addr[7:0]} -
                              (base_address_register & ~32'hFFF)) & 20'hFFFFF;

    assign local_write_addr = ({dwr_addr[31:24], dwr_addr[23:16],
                                dwr_addr[15:8], dwr_addr[7:0]} -
                               (base_address_register & ~32'hFFF)) & 20'hFFFFF;
";

fn join_lines(lines: &[&str]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// Module declaration, ports, delayed request registers and local address wires
pub fn module_header(bar: u8, config: &EmitterConfig) -> Fragment {
    let mut text = String::new();
    text.push_str(&format!("module {}(\n", config.module_name(bar)));
    text.push_str(PORTS);
    text.push_str(DECODE);
    Fragment::fixed(FragmentKind::Header, text)
}

/// Opens the clocked block and its reset branch
pub fn state_machine_start() -> Fragment {
    let lines = [
        "    always_ff @(posedge clk) begin",
        "        if (rst) begin",
        "            rd_rsp_valid <= 1'b0;",
    ];
    Fragment::fixed(FragmentKind::StateMachineStart, join_lines(&lines))
}

/// Leaves the reset branch and pipelines the incoming requests
pub fn state_machine_end() -> Fragment {
    let lines = [
        "        end else begin",
        "            drd_req_ctx     <= rd_req_ctx;",
        "            drd_req_valid   <= rd_req_valid;",
        "            dwr_valid       <= wr_valid;",
        "            drd_req_addr    <= rd_req_addr;",
        "            rd_rsp_ctx      <= drd_req_ctx;",
        "            rd_rsp_valid    <= drd_req_valid;",
        "            dwr_addr        <= wr_addr;",
        "            dwr_data        <= wr_data;",
    ];
    Fragment::fixed(FragmentKind::StateMachineEnd, join_lines(&lines))
}

/// Closes the run branch and the clocked block
pub fn state_machine_close() -> Fragment {
    Fragment::fixed(FragmentKind::StateMachineClose, "        end\n    end\n".to_string())
}

pub fn module_close() -> Fragment {
    Fragment::fixed(FragmentKind::ModuleClose, "endmodule\n".to_string())
}
