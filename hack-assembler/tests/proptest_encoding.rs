//! Property tests for encoding determinism and symbol-table density.

use hack_assembler::code::encode_a_instruction;
use hack_assembler::SymbolTable;
use proptest::prelude::*;

proptest! {
    /// Encoding the same 15-bit address twice always yields the same bit
    /// pattern, and that pattern round-trips back to the original address.
    #[test]
    fn a_instruction_encoding_is_deterministic(address in 0u16..=0x7FFF) {
        let first = encode_a_instruction(address);
        let second = encode_a_instruction(address);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 16);

        let decoded = u16::from_str_radix(&first, 2).unwrap();
        prop_assert_eq!(decoded, address);
    }

    /// User symbols are assigned consecutive RAM addresses starting from
    /// whatever base is passed in, in first-seen order, with no gaps.
    #[test]
    fn symbol_table_density_is_consecutive(
        names in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 1..20),
        base in 16u16..100,
    ) {
        let mut table = SymbolTable::new();
        let mut next = base;

        let mut seen = Vec::new();
        for name in &names {
            if !table.contains(name) && !seen.contains(name) {
                seen.push(name.clone());
            }
        }

        for (i, name) in seen.iter().enumerate() {
            let addr = table.get_or_insert(name, &mut next);
            prop_assert_eq!(addr, base + i as u16);
        }

        prop_assert_eq!(next, base + seen.len() as u16);
        prop_assert_eq!(table.user_symbol_count(), seen.len());
    }
}
