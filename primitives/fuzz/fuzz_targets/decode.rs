#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use commonware_codec::Encode;
use fruitchain_primitives::{
    decode, mocks, Block, BlockCfg, Context, Header, HeaderCfg, Locator, LocatorCfg,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    Header(Vec<u8>),
    Block(Vec<u8>),
    Locator { data: Vec<u8>, hash_context: bool },
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Header(data) => {
            let Ok(header) = decode::<Header>(Bytes::from(data.clone()), &HeaderCfg::default())
            else {
                return;
            };

            // Every accepted encoding is canonical
            assert_eq!(&header.encode()[..], &data[..]);
        }
        FuzzInput::Block(data) => {
            let Ok(block) = decode::<Block<mocks::Transaction>>(
                Bytes::from(data.clone()),
                &BlockCfg::default(),
            ) else {
                return;
            };
            assert_eq!(&block.encode()[..], &data[..]);
            assert_eq!(block.weight(), 4 * data.len() as u64);
        }
        FuzzInput::Locator { data, hash_context } => {
            let context = if hash_context {
                Context::Hash
            } else {
                Context::Network
            };
            let cfg = LocatorCfg {
                context,
                ..LocatorCfg::default()
            };
            let Ok(locator) = decode::<Locator>(Bytes::from(data.clone()), &cfg) else {
                return;
            };
            assert_eq!(&locator.encode_ctx(context)[..], &data[..]);
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
